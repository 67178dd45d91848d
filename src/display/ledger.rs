//! Ledger list formatting

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::config::Settings;
use crate::error::SchoolResult;
use crate::services::ledger::{LedgerTotals, StudentLedger};

#[derive(Tabled)]
struct LedgerRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "%")]
    progress: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Payment")]
    last_payment: String,
}

/// One row per student, followed by school totals
pub fn format_ledger_list(settings: &Settings, ledgers: &[StudentLedger]) -> SchoolResult<String> {
    if ledgers.is_empty() {
        return Ok("No students match.".to_string());
    }

    let rows: Vec<LedgerRow> = ledgers
        .iter()
        .map(|StudentLedger { student, summary }| LedgerRow {
            name: student.name.clone(),
            class: student.class_label(),
            total: settings.format_money(summary.total_liability),
            paid: settings.format_money(summary.paid_total),
            due: settings.format_money(summary.due_amount),
            progress: summary.progress_percent.to_string(),
            status: summary.status.to_string(),
            last_payment: summary
                .last_payment_date
                .map(|d| settings.format_date(d))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut output = Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::new(2..6)).with(Alignment::right()))
        .to_string();

    let totals = LedgerTotals::from_ledgers(ledgers)?;
    output.push_str(&format!(
        "\n\n{} student(s)  Total: {}  Collected: {}  Due: {}\n",
        totals.students,
        settings.format_money(totals.total_liability),
        settings.format_money(totals.collected),
        settings.format_money(totals.due),
    ));
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeeRecord, Money, Student};
    use crate::services::ledger::summarize;
    use chrono::NaiveDate;

    fn ledger(name: &str, agreed: i64, paid: i64) -> StudentLedger {
        let student = Student::with_fees(name, "5", Money::from_units(agreed), Money::zero());
        let fees = if paid > 0 {
            vec![FeeRecord::payment(
                student.id,
                Money::from_units(paid),
                NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            )]
        } else {
            Vec::new()
        };
        let summary = summarize(&student, &fees).unwrap();
        StudentLedger { student, summary }
    }

    #[test]
    fn test_ledger_list_with_totals() {
        let ledgers = vec![ledger("Asha", 10_000, 10_000), ledger("Ravi", 8_000, 2_000)];
        let output = format_ledger_list(&Settings::default(), &ledgers).unwrap();

        assert!(output.contains("Paid"));
        assert!(output.contains("Partial"));
        assert!(output.contains("01 Aug 2025"));
        assert!(output.contains("2 student(s)  Total: ₹18,000  Collected: ₹12,000  Due: ₹6,000"));
    }
}
