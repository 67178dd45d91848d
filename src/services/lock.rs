//! Lock gate
//!
//! Decides who is operating the tool. An unlocked screen carries the
//! identity that audit entries are attributed to.

use chrono::NaiveDate;
use std::fmt;

use crate::config::LockSettings;
use crate::error::{SchoolError, SchoolResult};
use crate::models::{Employee, EmployeeId};

/// Something offered to unlock the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Admin PIN or an active employee's PIN
    Pin(String),
    /// Employee (name, phone or ID) together with their date of birth
    DateOfBirth { employee: String, dob: NaiveDate },
}

/// Who unlocked the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Admin,
    Employee { id: EmployeeId, name: String },
}

impl Identity {
    /// Name recorded on audit entries
    pub fn actor(&self) -> String {
        match self {
            Self::Admin => "admin".to_string(),
            Self::Employee { name, .. } => name.clone(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "Administrator"),
            Self::Employee { id, name } => write!(f, "{} ({})", name, id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockState {
    Locked { failed_attempts: u32 },
    Unlocked { identity: Identity },
}

/// Gate state machine
#[derive(Debug, Clone)]
pub struct LockScreen {
    settings: LockSettings,
    state: LockState,
}

impl LockScreen {
    /// Starts locked, or unlocked as admin when the lock is disabled
    pub fn new(settings: &LockSettings) -> Self {
        let state = if settings.enabled {
            LockState::Locked { failed_attempts: 0 }
        } else {
            LockState::Unlocked {
                identity: Identity::Admin,
            }
        };
        Self {
            settings: settings.clone(),
            state,
        }
    }

    pub fn state(&self) -> &LockState {
        &self.state
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, LockState::Unlocked { .. })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            LockState::Unlocked { identity } => Some(identity),
            LockState::Locked { .. } => None,
        }
    }

    /// Attempts left before the gate stops accepting credentials
    pub fn remaining_attempts(&self) -> u32 {
        match self.state {
            LockState::Locked { failed_attempts } => {
                self.settings.max_attempts.saturating_sub(failed_attempts)
            }
            LockState::Unlocked { .. } => self.settings.max_attempts,
        }
    }

    /// Return to the locked state with a fresh attempt counter
    pub fn lock(&mut self) {
        if self.settings.enabled {
            self.state = LockState::Locked { failed_attempts: 0 };
        }
    }

    /// Try a credential against the settings and the staff list
    pub fn attempt(
        &mut self,
        credential: &Credential,
        employees: &[Employee],
    ) -> SchoolResult<&Identity> {
        let failed = match self.state {
            LockState::Locked { failed_attempts } => failed_attempts,
            LockState::Unlocked { .. } => 0,
        };
        if failed >= self.settings.max_attempts {
            return Err(SchoolError::Locked(
                "too many failed attempts; try again later".into(),
            ));
        }

        match verify(credential, &self.settings, employees) {
            Some(identity) => {
                tracing::info!(identity = %identity, "unlocked");
                self.state = LockState::Unlocked { identity };
            }
            None => {
                let failed_attempts = failed + 1;
                self.state = LockState::Locked { failed_attempts };
                tracing::warn!(failed_attempts, "unlock attempt rejected");

                let remaining = self.settings.max_attempts.saturating_sub(failed_attempts);
                return Err(SchoolError::Locked(if remaining == 0 {
                    "incorrect credential; no attempts left".to_string()
                } else {
                    format!("incorrect credential; {} attempt(s) left", remaining)
                }));
            }
        }

        match &self.state {
            LockState::Unlocked { identity } => Ok(identity),
            LockState::Locked { .. } => Err(SchoolError::Locked("still locked".into())),
        }
    }
}

/// Resolve a credential to an identity without touching any state
pub fn verify(
    credential: &Credential,
    settings: &LockSettings,
    employees: &[Employee],
) -> Option<Identity> {
    let as_identity = |e: &Employee| Identity::Employee {
        id: e.id,
        name: e.name.clone(),
    };

    match credential {
        Credential::Pin(pin) => {
            let pin = pin.trim();
            if pin.is_empty() {
                return None;
            }
            if settings.admin_pin.as_deref() == Some(pin) {
                return Some(Identity::Admin);
            }
            employees
                .iter()
                .find(|e| e.active && e.pin_matches(pin))
                .map(as_identity)
        }
        Credential::DateOfBirth { employee, dob } => {
            let wanted = employee.trim();
            if wanted.is_empty() {
                return None;
            }
            employees
                .iter()
                .filter(|e| e.active && e.date_of_birth == Some(*dob))
                .find(|e| {
                    e.id.matches(wanted)
                        || (!e.phone.is_empty() && e.phone == wanted)
                        || e.name.eq_ignore_ascii_case(wanted)
                })
                .map(as_identity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LockSettings {
        LockSettings {
            enabled: true,
            admin_pin: Some("9999".into()),
            max_attempts: 3,
        }
    }

    fn staff() -> Vec<Employee> {
        let mut sunita = Employee::new("Sunita Rao", "Teacher");
        sunita.pin = Some("1357".into());
        sunita.phone = "9876543210".into();
        sunita.date_of_birth = NaiveDate::from_ymd_opt(1985, 6, 1);

        let mut former = Employee::new("Ravi", "Clerk");
        former.pin = Some("2468".into());
        former.active = false;

        vec![sunita, former]
    }

    #[test]
    fn test_disabled_lock_starts_unlocked_as_admin() {
        let screen = LockScreen::new(&LockSettings::default());
        assert_eq!(screen.identity(), Some(&Identity::Admin));
    }

    #[test]
    fn test_admin_and_employee_pins() {
        let staff = staff();
        let mut screen = LockScreen::new(&settings());
        assert!(!screen.is_unlocked());

        let identity = screen.attempt(&Credential::Pin("9999".into()), &staff).unwrap();
        assert_eq!(identity, &Identity::Admin);

        screen.lock();
        let identity = screen
            .attempt(&Credential::Pin(" 1357 ".into()), &staff)
            .unwrap()
            .clone();
        assert_eq!(identity.actor(), "Sunita Rao");
    }

    #[test]
    fn test_inactive_employee_rejected() {
        let mut screen = LockScreen::new(&settings());
        let err = screen
            .attempt(&Credential::Pin("2468".into()), &staff())
            .unwrap_err();
        assert!(matches!(err, SchoolError::Locked(_)));
        assert_eq!(screen.state(), &LockState::Locked { failed_attempts: 1 });
    }

    #[test]
    fn test_date_of_birth_credential() {
        let staff = staff();
        let dob = NaiveDate::from_ymd_opt(1985, 6, 1).unwrap();

        for who in ["sunita rao", "9876543210", &staff[0].id.to_string()] {
            let credential = Credential::DateOfBirth {
                employee: who.to_string(),
                dob,
            };
            assert!(verify(&credential, &settings(), &staff).is_some(), "{}", who);
        }

        let wrong = Credential::DateOfBirth {
            employee: "Sunita Rao".into(),
            dob: NaiveDate::from_ymd_opt(1985, 6, 2).unwrap(),
        };
        assert!(verify(&wrong, &settings(), &staff).is_none());
    }

    #[test]
    fn test_attempts_exhausted() {
        let staff = staff();
        let mut screen = LockScreen::new(&settings());
        let bad = Credential::Pin("0000".into());

        for _ in 0..3 {
            assert!(screen.attempt(&bad, &staff).is_err());
        }
        assert_eq!(screen.remaining_attempts(), 0);

        // Even the right PIN is refused now
        assert!(screen.attempt(&Credential::Pin("9999".into()), &staff).is_err());
        assert!(!screen.is_unlocked());

        screen.lock();
        assert!(screen.attempt(&Credential::Pin("9999".into()), &staff).is_ok());
    }
}
