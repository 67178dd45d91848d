//! CSV Export functionality
//!
//! Ledger summaries and raw fee records in spreadsheet-friendly form.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{SchoolError, SchoolResult};
use crate::services::ledger::StudentLedger;
use crate::storage::Storage;

const LEDGER_HEADER: &[&str] = &[
    "Student ID",
    "Name",
    "Class",
    "Admission No",
    "Agreed Fees",
    "Back Logs",
    "Total Liability",
    "Paid",
    "Due",
    "Overpaid",
    "Progress %",
    "Status",
    "Payments",
    "Last Payment",
    "Last Payment Date",
];

const FEES_HEADER: &[&str] = &[
    "Fee ID",
    "Student",
    "Date",
    "Amount",
    "Status",
    "Mode",
    "Note",
    "Deleted",
];

fn csv_error(e: csv::Error) -> SchoolError {
    SchoolError::Export(format!("CSV write error: {}", e))
}

/// Write one row per student ledger
pub fn export_ledger_csv<W: Write>(ledgers: &[StudentLedger], writer: W) -> SchoolResult<()> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(LEDGER_HEADER).map_err(csv_error)?;

    for StudentLedger { student, summary } in ledgers {
        csv.write_record(&[
            student.id.as_uuid().to_string(),
            student.name.clone(),
            student.class_label(),
            student.admission_number.clone().unwrap_or_default(),
            summary.total_agreed.to_decimal_string(),
            student.back_logs.to_decimal_string(),
            summary.total_liability.to_decimal_string(),
            summary.paid_total.to_decimal_string(),
            summary.due_amount.to_decimal_string(),
            summary.overpaid_amount.to_decimal_string(),
            summary.progress_percent.to_string(),
            summary.status.to_string(),
            summary.transaction_count.to_string(),
            summary.last_payment_amount.to_decimal_string(),
            summary
                .last_payment_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ])
        .map_err(csv_error)?;
    }

    csv.flush()
        .map_err(|e| SchoolError::Export(format!("CSV flush error: {}", e)))?;
    tracing::debug!(rows = ledgers.len(), "ledger CSV written");
    Ok(())
}

/// Write every fee record, deleted ones included, oldest first
pub fn export_fees_csv<W: Write>(storage: &Storage, writer: W) -> SchoolResult<()> {
    let names: HashMap<_, _> = storage
        .students
        .get_all()?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let mut fees = storage.fees.get_all()?;
    fees.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(FEES_HEADER).map_err(csv_error)?;

    for fee in &fees {
        let student = names
            .get(&fee.student_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());
        csv.write_record(&[
            fee.id.as_uuid().to_string(),
            student,
            fee.date.format("%Y-%m-%d").to_string(),
            fee.amount.to_decimal_string(),
            fee.status.to_string(),
            fee.mode.to_string(),
            fee.note.clone(),
            fee.is_deleted.to_string(),
        ])
        .map_err(csv_error)?;
    }

    csv.flush()
        .map_err(|e| SchoolError::Export(format!("CSV flush error: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SchoolPaths;
    use crate::models::{FeeRecord, Money, Student};
    use crate::services::LedgerService;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SchoolPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_ledger_csv() {
        let (_temp_dir, storage) = create_test_storage();
        let student = Student::with_fees("Khan, Imran", "10", Money::from_units(10_000), Money::zero());
        storage.students.upsert(student.clone()).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        storage
            .fees
            .upsert(FeeRecord::payment(student.id, Money::from_cents(250_050), date))
            .unwrap();

        let ledgers = LedgerService::new(&storage).list(false, None).unwrap();
        let mut output = Vec::new();
        export_ledger_csv(&ledgers, &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Student ID,Name,Class"));
        // Names with commas are quoted
        assert!(lines[1].contains("\"Khan, Imran\",10,"));
        assert!(lines[1].contains(",2500.50,7499.50,0.00,25,Partial,1,2500.50,2025-06-02"));
    }

    #[test]
    fn test_fees_csv_includes_deleted() {
        let (_temp_dir, storage) = create_test_storage();
        let student = Student::new("Asha");
        storage.students.upsert(student.clone()).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let mut fee = FeeRecord::payment(student.id, Money::from_units(300), date);
        fee.soft_delete();
        storage.fees.upsert(fee).unwrap();

        let mut output = Vec::new();
        export_fees_csv(&storage, &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();
        assert!(csv.contains(",Asha,2025-06-02,300.00,Paid,Cash,,true"));
    }
}
