//! Fee record display formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::models::FeeRecord;

#[derive(Tabled)]
struct FeeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Note")]
    note: String,
}

/// Format fee records as a table; deleted records are flagged
pub fn format_fee_list(settings: &Settings, fees: &[FeeRecord]) -> String {
    if fees.is_empty() {
        return "No fee records found.".to_string();
    }

    let rows: Vec<FeeRow> = fees
        .iter()
        .map(|fee| FeeRow {
            id: fee.id.to_string(),
            date: settings.format_date(fee.date),
            amount: settings.format_money(fee.amount),
            status: if fee.is_deleted {
                format!("{} (deleted)", fee.status)
            } else {
                fee.status.to_string()
            },
            mode: if fee.is_paid() {
                fee.mode.to_string()
            } else {
                "-".to_string()
            },
            note: fee.note.clone(),
        })
        .collect();

    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::single(2)).with(Alignment::right()))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeeStatus, Money, StudentId};
    use chrono::NaiveDate;

    #[test]
    fn test_format_fee_list() {
        let student = StudentId::new();
        let date = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
        let paid = FeeRecord::payment(student, Money::from_units(2_500), date);
        let mut charge = FeeRecord::new(student, Money::from_units(900), date, FeeStatus::Overdue);
        charge.soft_delete();

        let output = format_fee_list(&Settings::default(), &[paid, charge]);
        assert!(output.contains("₹2,500"));
        assert!(output.contains("15 Jul 2025"));
        assert!(output.contains("Overdue (deleted)"));
        assert!(output.contains("Cash"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_fee_list(&Settings::default(), &[]), "No fee records found.");
    }
}
