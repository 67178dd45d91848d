//! Fee ledger view model
//!
//! `LedgerSummary` is derived from a student's fee terms and fee records on
//! every read and is never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Overall fee standing of a student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    /// Liability fully covered
    Paid,
    /// Some payment received without covering a positive liability, or
    /// payments on file when no fees are owed
    Partial,
    /// Nothing owed at all
    NoFees,
    /// Dues outstanding and nothing paid
    Unpaid,
}

impl LedgerStatus {
    /// Derive a status. Precedence is Paid, Partial, No Fees, Unpaid.
    pub fn derive(total_liability: Money, paid_total: Money, due_amount: Money) -> Self {
        if !due_amount.is_positive() && total_liability.is_positive() {
            Self::Paid
        } else if paid_total.is_positive() {
            Self::Partial
        } else if total_liability.is_zero() {
            Self::NoFees
        } else {
            Self::Unpaid
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "paid" => Some(Self::Paid),
            "partial" => Some(Self::Partial),
            "no fees" | "nofees" | "none" => Some(Self::NoFees),
            "unpaid" => Some(Self::Unpaid),
            _ => None,
        }
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "Paid"),
            Self::Partial => write!(f, "Partial"),
            Self::NoFees => write!(f, "No Fees"),
            Self::Unpaid => write!(f, "Unpaid"),
        }
    }
}

/// Liability, payment and status figures for one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_agreed: Money,
    /// Agreed fees plus back logs
    pub total_liability: Money,
    pub paid_total: Money,
    /// Liability minus payments, floored at zero
    pub due_amount: Money,
    /// Payments beyond the liability
    pub overpaid_amount: Money,
    /// Share of the liability paid, 0-100
    pub progress_percent: u32,
    pub status: LedgerStatus,
    /// Number of paid records
    pub transaction_count: usize,
    pub last_payment_amount: Money,
    pub last_payment_date: Option<NaiveDate>,
}

impl LedgerSummary {
    pub fn has_dues(&self) -> bool {
        self.due_amount.is_positive()
    }
}
