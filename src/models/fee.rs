//! Fee record model
//!
//! One payment or charge entry against a student. Records are soft-deleted:
//! `is_deleted` keeps them on disk for the audit trail while every ledger
//! computation skips them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{FeeId, StudentId};
use super::money::Money;

/// Status of a fee record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    /// Money received
    Paid,
    /// Charge raised, not yet paid
    #[default]
    Pending,
    /// Charge past its due date
    Overdue,
}

impl FeeStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Parse a status from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "paid" => Some(Self::Paid),
            "pending" => Some(Self::Pending),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "Paid"),
            Self::Pending => write!(f, "Pending"),
            Self::Overdue => write!(f, "Overdue"),
        }
    }
}

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    #[default]
    Cash,
    Upi,
    Bank,
    Cheque,
    Other,
}

impl PaymentMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "upi" => Some(Self::Upi),
            "bank" | "transfer" | "neft" => Some(Self::Bank),
            "cheque" | "check" => Some(Self::Cheque),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "Cash"),
            Self::Upi => write!(f, "UPI"),
            Self::Bank => write!(f, "Bank transfer"),
            Self::Cheque => write!(f, "Cheque"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A fee entry for one student
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeRecord {
    pub id: FeeId,

    pub student_id: StudentId,

    /// Amount, never negative
    pub amount: Money,

    /// Payment date for paid records, due date otherwise
    pub date: NaiveDate,

    #[serde(default)]
    pub status: FeeStatus,

    #[serde(default)]
    pub mode: PaymentMode,

    /// Free text (e.g. "Term 2 tuition")
    #[serde(default)]
    pub note: String,

    #[serde(default)]
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeeRecord {
    /// Create a new fee record
    pub fn new(student_id: StudentId, amount: Money, date: NaiveDate, status: FeeStatus) -> Self {
        let now = Utc::now();
        Self {
            id: FeeId::new(),
            student_id,
            amount,
            date,
            status,
            mode: PaymentMode::default(),
            note: String::new(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a paid record
    pub fn payment(student_id: StudentId, amount: Money, date: NaiveDate) -> Self {
        Self::new(student_id, amount, date, FeeStatus::Paid)
    }

    /// Whether this record counts toward the ledger of `student_id`
    pub fn is_live_for(&self, student_id: StudentId) -> bool {
        self.student_id == student_id && !self.is_deleted
    }

    pub fn is_paid(&self) -> bool {
        self.status.is_paid()
    }

    /// Mark the record as paid on the given date
    pub fn mark_paid(&mut self, date: NaiveDate, mode: PaymentMode) {
        self.status = FeeStatus::Paid;
        self.date = date;
        self.mode = mode;
        self.updated_at = Utc::now();
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.updated_at = Utc::now();
    }

    pub fn restore(&mut self) {
        self.is_deleted = false;
        self.updated_at = Utc::now();
    }

    /// Validate the record
    pub fn validate(&self) -> Result<(), FeeValidationError> {
        if self.amount.is_negative() {
            return Err(FeeValidationError::NegativeAmount(self.amount));
        }
        if self.amount.is_zero() {
            return Err(FeeValidationError::ZeroAmount);
        }
        Ok(())
    }
}

impl fmt::Display for FeeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.amount,
            self.status
        )
    }
}

/// Validation errors for fee records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeValidationError {
    NegativeAmount(Money),
    ZeroAmount,
}

impl fmt::Display for FeeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Fee amount cannot be negative: {}", amount)
            }
            Self::ZeroAmount => write!(f, "Fee amount must be greater than zero"),
        }
    }
}

impl std::error::Error for FeeValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(FeeStatus::parse("PAID"), Some(FeeStatus::Paid));
        assert_eq!(FeeStatus::parse("overdue"), Some(FeeStatus::Overdue));
        assert_eq!(FeeStatus::parse("waived"), None);
    }

    #[test]
    fn test_live_for_student() {
        let student = StudentId::new();
        let mut fee = FeeRecord::payment(student, Money::from_units(500), date(1));
        assert!(fee.is_live_for(student));
        assert!(!fee.is_live_for(StudentId::new()));

        fee.soft_delete();
        assert!(!fee.is_live_for(student));

        fee.restore();
        assert!(fee.is_live_for(student));
    }

    #[test]
    fn test_mark_paid() {
        let mut fee = FeeRecord::new(StudentId::new(), Money::from_units(800), date(1), FeeStatus::Pending);
        assert!(!fee.is_paid());
        fee.mark_paid(date(10), PaymentMode::Upi);
        assert!(fee.is_paid());
        assert_eq!(fee.date, date(10));
        assert_eq!(fee.mode, PaymentMode::Upi);
    }

    #[test]
    fn test_validation() {
        let student = StudentId::new();
        assert!(FeeRecord::payment(student, Money::from_units(1), date(1)).validate().is_ok());
        assert_eq!(
            FeeRecord::payment(student, Money::zero(), date(1)).validate(),
            Err(FeeValidationError::ZeroAmount)
        );
        assert!(matches!(
            FeeRecord::payment(student, Money::from_units(-5), date(1)).validate(),
            Err(FeeValidationError::NegativeAmount(_))
        ));
    }

    #[test]
    fn test_deleted_flag_defaults_false() {
        let fee = FeeRecord::payment(StudentId::new(), Money::from_units(100), date(2));
        let mut value = serde_json::to_value(&fee).unwrap();
        value.as_object_mut().unwrap().remove("is_deleted");
        let back: FeeRecord = serde_json::from_value(value).unwrap();
        assert!(!back.is_deleted);
    }
}
