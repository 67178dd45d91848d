//! Employee model
//!
//! Staff records. An employee may carry a PIN and a date of birth, either of
//! which opens the lock gate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::EmployeeId;
use super::money::Money;

/// A member of staff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,

    pub name: String,

    /// Role (e.g. "Teacher", "Accountant")
    #[serde(default)]
    pub designation: String,

    #[serde(default)]
    pub department: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default)]
    pub joining_date: Option<NaiveDate>,

    /// Monthly salary
    #[serde(default)]
    pub salary: Money,

    /// Lock gate PIN (4-6 digits)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Create a new employee
    pub fn new(name: impl Into<String>, designation: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: EmployeeId::new(),
            name: name.into(),
            designation: designation.into(),
            department: String::new(),
            phone: String::new(),
            email: String::new(),
            date_of_birth: None,
            joining_date: None,
            salary: Money::zero(),
            pin: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the given PIN matches this employee's PIN
    pub fn pin_matches(&self, pin: &str) -> bool {
        self.pin.as_deref() == Some(pin.trim())
    }

    /// Copy with the PIN masked, for the audit log and exports
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.pin = copy.pin.as_ref().map(|_| "****".to_string());
        copy
    }

    /// Validate the employee record
    pub fn validate(&self) -> Result<(), EmployeeValidationError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeValidationError::EmptyName);
        }

        if self.salary.is_negative() {
            return Err(EmployeeValidationError::NegativeSalary);
        }

        if let Some(pin) = &self.pin {
            if !is_valid_pin(pin) {
                return Err(EmployeeValidationError::InvalidPin);
            }
        }

        if !self.email.is_empty() && !self.email.contains('@') {
            return Err(EmployeeValidationError::InvalidEmail(self.email.clone()));
        }

        Ok(())
    }
}

/// PINs are 4 to 6 ASCII digits
pub fn is_valid_pin(pin: &str) -> bool {
    (4..=6).contains(&pin.len()) && pin.chars().all(|c| c.is_ascii_digit())
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.designation.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.designation)
        }
    }
}

/// Validation errors for employees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeValidationError {
    EmptyName,
    NegativeSalary,
    InvalidPin,
    InvalidEmail(String),
}

impl fmt::Display for EmployeeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Employee name cannot be empty"),
            Self::NegativeSalary => write!(f, "Salary cannot be negative"),
            Self::InvalidPin => write!(f, "PIN must be 4 to 6 digits"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
        }
    }
}

impl std::error::Error for EmployeeValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_rules() {
        assert!(is_valid_pin("1234"));
        assert!(is_valid_pin("123456"));
        assert!(!is_valid_pin("123"));
        assert!(!is_valid_pin("1234567"));
        assert!(!is_valid_pin("12a4"));
    }

    #[test]
    fn test_validation() {
        let mut employee = Employee::new("Sunita Rao", "Accountant");
        assert!(employee.validate().is_ok());

        employee.pin = Some("12".into());
        assert_eq!(employee.validate(), Err(EmployeeValidationError::InvalidPin));

        employee.pin = Some("4321".into());
        employee.email = "sunita".into();
        assert!(matches!(
            employee.validate(),
            Err(EmployeeValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_pin_matches() {
        let mut employee = Employee::new("Sunita Rao", "Accountant");
        assert!(!employee.pin_matches("4321"));
        employee.pin = Some("4321".into());
        assert!(employee.pin_matches(" 4321 "));
        assert!(!employee.pin_matches("1234"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Employee::new("Sunita Rao", "Accountant").to_string(),
            "Sunita Rao (Accountant)"
        );
        assert_eq!(Employee::new("Sunita Rao", "").to_string(), "Sunita Rao");
    }
}
