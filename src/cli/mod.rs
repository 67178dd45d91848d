//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod config;
pub mod document;
pub mod employee;
pub mod export;
pub mod fee;
pub mod ledger;
pub mod student;

pub use audit::handle_audit_command;
pub use config::{handle_config_command, ConfigCommands};
pub use document::{handle_document_command, DocumentCommands};
pub use employee::{handle_employee_command, EmployeeCommands};
pub use export::{handle_export_command, ExportCommands};
pub use fee::{handle_fee_command, FeeCommands};
pub use ledger::{handle_ledger_command, LedgerCommands};
pub use student::{handle_student_command, StudentCommands};

use chrono::NaiveDate;

use crate::error::{SchoolError, SchoolResult};
use crate::models::Money;

/// Parse an amount typed on the command line
pub fn parse_money(value: &str) -> SchoolResult<Money> {
    Money::parse(value).map_err(|e| SchoolError::InvalidInput(e.to_string()))
}

pub fn parse_optional_money(value: Option<String>) -> SchoolResult<Option<Money>> {
    value.as_deref().map(parse_money).transpose()
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(value: &str) -> SchoolResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        SchoolError::InvalidInput(format!(
            "Invalid date '{}'. Use YYYY-MM-DD (e.g. 2025-04-01)",
            value
        ))
    })
}

pub fn parse_optional_date(value: Option<String>) -> SchoolResult<Option<NaiveDate>> {
    value.as_deref().map(parse_date).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("₹12,500").unwrap(), Money::from_units(12_500));
        assert!(parse_money("twelve").unwrap_err().is_invalid_input());
        assert_eq!(parse_optional_money(None).unwrap(), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-04-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
        );
        assert!(parse_date("01/04/2025").unwrap_err().is_invalid_input());
        assert!(parse_optional_date(Some("2025-02-30".into())).is_err());
    }
}
