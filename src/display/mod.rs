//! Display formatting for terminal output
//!
//! Tables for record lists, detail views, and the printable documents
//! (ID cards and transfer certificates).

pub mod documents;
pub mod employee;
pub mod fee;
pub mod ledger;
pub mod student;

pub use documents::{format_employee_id_card, format_student_id_card, format_transfer_certificate};
pub use employee::{format_employee_details, format_employee_list};
pub use fee::format_fee_list;
pub use ledger::format_ledger_list;
pub use student::{format_student_list, format_student_profile};

use chrono::NaiveDate;

use crate::config::Settings;

/// Placeholder for a missing field
pub const NOT_AVAILABLE: &str = "N/A";

/// The value, or `N/A` when it is blank
pub fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

pub fn date_or_na(settings: &Settings, date: Option<NaiveDate>) -> String {
    date.map(|d| settings.format_date(d))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(or_na("  "), "N/A");
        assert_eq!(or_na("Meena"), "Meena");
        assert_eq!(date_or_na(&Settings::default(), None), "N/A");
        assert_eq!(
            date_or_na(&Settings::default(), NaiveDate::from_ymd_opt(2024, 12, 1)),
            "01 Dec 2024"
        );
    }
}
