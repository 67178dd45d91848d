//! Reminder and payment-confirmation messages for guardians

use crate::config::Settings;
use crate::error::{SchoolError, SchoolResult};
use crate::models::{FeeRecord, LedgerSummary, Student};

fn salutation(student: &Student) -> String {
    if student.guardian_name.trim().is_empty() {
        "Dear Parent/Guardian,".to_string()
    } else {
        format!("Dear {},", student.guardian_name.trim())
    }
}

fn student_line(student: &Student) -> String {
    let class = student.class_label();
    if class.is_empty() {
        student.name.clone()
    } else {
        format!("{} (Class {})", student.name, class)
    }
}

/// Fee reminder for a student with outstanding dues
pub fn compose_reminder(
    settings: &Settings,
    student: &Student,
    summary: &LedgerSummary,
) -> SchoolResult<String> {
    if !summary.has_dues() {
        return Err(SchoolError::Validation(format!(
            "{} has no outstanding dues",
            student.name
        )));
    }

    let mut lines = vec![
        salutation(student),
        String::new(),
        format!(
            "This is a reminder from {} that fees of {} are due for {}.",
            settings.school_name,
            settings.format_money(summary.due_amount),
            student_line(student)
        ),
        String::new(),
        format!("Total fees:  {}", settings.format_money(summary.total_liability)),
        format!("Paid so far: {}", settings.format_money(summary.paid_total)),
        format!("Balance due: {}", settings.format_money(summary.due_amount)),
    ];

    if let Some(date) = summary.last_payment_date {
        lines.push(format!(
            "Last payment: {} on {}",
            settings.format_money(summary.last_payment_amount),
            settings.format_date(date)
        ));
    }

    lines.push(String::new());
    lines.push("Kindly clear the dues at the earliest. Please ignore this message if already paid.".into());
    lines.push(String::new());
    lines.push(format!("Regards,\n{}", settings.school_name));

    Ok(lines.join("\n"))
}

/// Receipt for one paid fee record
pub fn compose_payment_confirmation(
    settings: &Settings,
    student: &Student,
    fee: &FeeRecord,
    summary: &LedgerSummary,
) -> SchoolResult<String> {
    if fee.student_id != student.id {
        return Err(SchoolError::Validation(format!(
            "Fee record {} does not belong to {}",
            fee.id, student.name
        )));
    }
    if !fee.is_paid() || fee.is_deleted {
        return Err(SchoolError::Validation(format!(
            "Fee record {} is not a payment",
            fee.id
        )));
    }

    let mut lines = vec![
        salutation(student),
        String::new(),
        format!(
            "We have received {} towards the fees of {} on {} ({}).",
            settings.format_money(fee.amount),
            student_line(student),
            settings.format_date(fee.date),
            fee.mode
        ),
    ];
    if !fee.note.is_empty() {
        lines.push(format!("Note: {}", fee.note));
    }
    lines.push(format!("Receipt no: {}", fee.id));
    lines.push(String::new());

    if summary.has_dues() {
        lines.push(format!(
            "Remaining balance: {}",
            settings.format_money(summary.due_amount)
        ));
    } else {
        lines.push("All fees are now cleared.".to_string());
    }
    if summary.overpaid_amount.is_positive() {
        lines.push(format!(
            "Advance held: {}",
            settings.format_money(summary.overpaid_amount)
        ));
    }

    lines.push(String::new());
    lines.push(format!("Thank you,\n{}", settings.school_name));

    Ok(lines.join("\n"))
}

/// The student's most recent payment, if any
pub fn latest_payment(history: &[FeeRecord]) -> Option<&FeeRecord> {
    // Stable: among same-day payments the first in history order wins
    let mut latest: Option<&FeeRecord> = None;
    for fee in history.iter().filter(|f| f.is_paid() && !f.is_deleted) {
        if latest.map_or(true, |l| fee.date > l.date) {
            latest = Some(fee);
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeeStatus, Money};
    use crate::services::ledger::summarize;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn student() -> Student {
        let mut student = Student::with_fees("Asha", "8", Money::from_units(12_000), Money::from_units(500));
        student.section = "B".into();
        student.guardian_name = "Meena".into();
        student
    }

    fn settings() -> Settings {
        Settings {
            school_name: "Sunrise Public School".into(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_reminder_lists_dues() {
        let student = student();
        let fees = vec![FeeRecord::payment(student.id, Money::from_units(4000), date(5))];
        let summary = summarize(&student, &fees).unwrap();

        let text = compose_reminder(&settings(), &student, &summary).unwrap();
        assert!(text.starts_with("Dear Meena,"));
        assert!(text.contains("fees of ₹8,500 are due for Asha (Class 8-B)"));
        assert!(text.contains("Total fees:  ₹12,500"));
        assert!(text.contains("Last payment: ₹4,000 on 05 Apr 2025"));
        assert!(text.ends_with("Sunrise Public School"));
    }

    #[test]
    fn test_reminder_refused_without_dues() {
        let student = student();
        let fees = vec![FeeRecord::payment(student.id, Money::from_units(12_500), date(5))];
        let summary = summarize(&student, &fees).unwrap();
        assert!(compose_reminder(&settings(), &student, &summary)
            .unwrap_err()
            .is_validation());

        let free = Student::new("Ravi");
        let summary = summarize(&free, &[]).unwrap();
        assert!(compose_reminder(&settings(), &free, &summary).is_err());
    }

    #[test]
    fn test_payment_confirmation() {
        let student = student();
        let mut fee = FeeRecord::payment(student.id, Money::from_units(12_500), date(7));
        fee.note = "Annual fees".into();
        let summary = summarize(&student, std::slice::from_ref(&fee)).unwrap();

        let text = compose_payment_confirmation(&settings(), &student, &fee, &summary).unwrap();
        assert!(text.contains("We have received ₹12,500 towards the fees of Asha (Class 8-B) on 07 Apr 2025 (Cash)."));
        assert!(text.contains("Note: Annual fees"));
        assert!(text.contains("All fees are now cleared."));

        let pending = FeeRecord::new(student.id, Money::from_units(10), date(8), FeeStatus::Pending);
        assert!(compose_payment_confirmation(&settings(), &student, &pending, &summary).is_err());
    }

    #[test]
    fn test_latest_payment() {
        let id = Student::new("Asha").id;
        let first = FeeRecord::payment(id, Money::from_units(100), date(9));
        let second = FeeRecord::payment(id, Money::from_units(200), date(9));
        let older = FeeRecord::payment(id, Money::from_units(300), date(1));
        let pending = FeeRecord::new(id, Money::from_units(50), date(20), FeeStatus::Pending);

        let history = vec![pending, first.clone(), second, older];
        assert_eq!(latest_payment(&history).map(|f| f.id), Some(first.id));
        assert!(latest_payment(&[]).is_none());
    }
}
