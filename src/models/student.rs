//! Student model
//!
//! A student profile with contact details and the fee terms the ledger reads
//! (`total_agreed_fees` and `back_logs`). Missing fee fields deserialize as
//! zero so older records without them stay readable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::StudentId;
use super::money::Money;

/// A student enrolled at the school
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,

    pub name: String,

    /// Class or grade (e.g. "8")
    #[serde(default)]
    pub class: String,

    #[serde(default)]
    pub section: String,

    #[serde(default)]
    pub roll_number: Option<u32>,

    /// School-issued admission number, unique when present
    #[serde(default)]
    pub admission_number: Option<String>,

    #[serde(default)]
    pub guardian_name: String,

    /// Guardian contact number used for reminders
    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default)]
    pub admission_date: Option<NaiveDate>,

    /// Fees agreed for the current session
    #[serde(default)]
    pub total_agreed_fees: Money,

    /// Unpaid amount carried over from earlier sessions
    #[serde(default)]
    pub back_logs: Money,

    /// False once the student has left the school
    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub leaving_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Student {
    /// Create a new student with no fee terms
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: StudentId::new(),
            name: name.into(),
            class: String::new(),
            section: String::new(),
            roll_number: None,
            admission_number: None,
            guardian_name: String::new(),
            phone: String::new(),
            address: String::new(),
            date_of_birth: None,
            admission_date: None,
            total_agreed_fees: Money::zero(),
            back_logs: Money::zero(),
            active: true,
            leaving_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a student in a class with agreed fees
    pub fn with_fees(
        name: impl Into<String>,
        class: impl Into<String>,
        total_agreed_fees: Money,
        back_logs: Money,
    ) -> Self {
        let mut student = Self::new(name);
        student.class = class.into();
        student.total_agreed_fees = total_agreed_fees;
        student.back_logs = back_logs;
        student
    }

    /// Class and section joined for display ("8-B", or just "8")
    pub fn class_label(&self) -> String {
        match (self.class.is_empty(), self.section.is_empty()) {
            (true, _) => String::new(),
            (false, true) => self.class.clone(),
            (false, false) => format!("{}-{}", self.class, self.section),
        }
    }

    /// Mark the student as having left the school
    pub fn deactivate(&mut self, leaving_date: NaiveDate) {
        self.active = false;
        self.leaving_date = Some(leaving_date);
        self.updated_at = Utc::now();
    }

    /// Validate the student record
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        if self.name.trim().is_empty() {
            return Err(StudentValidationError::EmptyName);
        }

        if self.total_agreed_fees.is_negative() {
            return Err(StudentValidationError::NegativeAmount("agreed fees"));
        }

        if self.back_logs.is_negative() {
            return Err(StudentValidationError::NegativeAmount("back logs"));
        }

        if let (Some(dob), Some(admitted)) = (self.date_of_birth, self.admission_date) {
            if dob > admitted {
                return Err(StudentValidationError::BirthAfterAdmission);
            }
        }

        Ok(())
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = self.class_label();
        if class.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, class)
        }
    }
}

/// Validation errors for students
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentValidationError {
    EmptyName,
    NegativeAmount(&'static str),
    BirthAfterAdmission,
}

impl fmt::Display for StudentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Student name cannot be empty"),
            Self::NegativeAmount(field) => write!(f, "Student {} cannot be negative", field),
            Self::BirthAfterAdmission => {
                write!(f, "Date of birth cannot be after the admission date")
            }
        }
    }
}

impl std::error::Error for StudentValidationError {}
