//! Printable documents
//!
//! ID cards and transfer certificates rendered as fixed-width text, ready to
//! print or paste into a message.

use chrono::NaiveDate;

use super::{date_or_na, or_na};
use crate::config::Settings;
use crate::error::{SchoolError, SchoolResult};
use crate::models::{Employee, LedgerSummary, Student};

const CARD_WIDTH: usize = 44;
const CERTIFICATE_WIDTH: usize = 64;

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

fn border(width: usize) -> String {
    format!("+{}+", "-".repeat(width))
}

fn centered(value: &str, width: usize) -> String {
    format!("|{:^width$}|", truncate(value, width), width = width)
}

fn field(label: &str, value: &str, width: usize) -> String {
    let text = format!(" {:<13}: {}", label, value);
    format!("|{:<width$}|", truncate(&text, width), width = width)
}

fn card(settings: &Settings, title: &str, fields: &[(&str, String)]) -> String {
    let inner = CARD_WIDTH - 2;
    let mut lines = vec![
        border(inner),
        centered(&settings.school_name.to_uppercase(), inner),
    ];
    if !settings.school_address.is_empty() {
        lines.push(centered(&settings.school_address, inner));
    }
    lines.push(centered(title, inner));
    lines.push(border(inner));
    for (label, value) in fields {
        lines.push(field(label, value, inner));
    }
    lines.push(border(inner));
    lines.join("\n") + "\n"
}

/// Identity card for a student
pub fn format_student_id_card(settings: &Settings, student: &Student) -> String {
    card(
        settings,
        "STUDENT IDENTITY CARD",
        &[
            ("Name", student.name.clone()),
            ("Class", or_na(&student.class_label()).to_string()),
            (
                "Roll No",
                student
                    .roll_number
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Admission No",
                or_na(student.admission_number.as_deref().unwrap_or("")).to_string(),
            ),
            ("Date of Birth", date_or_na(settings, student.date_of_birth)),
            ("Guardian", or_na(&student.guardian_name).to_string()),
            ("Phone", or_na(&student.phone).to_string()),
            ("Address", or_na(&student.address).to_string()),
        ],
    )
}

/// Identity card for a member of staff
pub fn format_employee_id_card(settings: &Settings, employee: &Employee) -> String {
    card(
        settings,
        "STAFF IDENTITY CARD",
        &[
            ("Name", employee.name.clone()),
            ("Designation", or_na(&employee.designation).to_string()),
            ("Department", or_na(&employee.department).to_string()),
            ("Employee ID", employee.id.to_string()),
            ("Date of Birth", date_or_na(settings, employee.date_of_birth)),
            ("Phone", or_na(&employee.phone).to_string()),
            ("Joined", date_or_na(settings, employee.joining_date)),
        ],
    )
}

/// Transfer certificate for a student who has left
///
/// Only students marked as left can be given one. The dues line comes from
/// the ledger: "No dues" is printed whenever nothing is due.
pub fn format_transfer_certificate(
    settings: &Settings,
    student: &Student,
    summary: &LedgerSummary,
    issued_on: NaiveDate,
) -> SchoolResult<String> {
    if student.active {
        return Err(SchoolError::Validation(format!(
            "{} is still enrolled; mark the student as left before issuing a transfer certificate",
            student.name
        )));
    }

    let dues = if !summary.has_dues() {
        "No dues".to_string()
    } else {
        format!(
            "{} outstanding ({})",
            settings.format_money(summary.due_amount),
            summary.status
        )
    };

    let rule = "=".repeat(CERTIFICATE_WIDTH);
    let center = |s: &str| format!("{:^width$}", s, width = CERTIFICATE_WIDTH);

    let mut lines = vec![
        rule.clone(),
        center(&settings.school_name.to_uppercase()),
    ];
    if !settings.school_address.is_empty() {
        lines.push(center(&settings.school_address));
    }
    lines.push(String::new());
    lines.push(center("TRANSFER CERTIFICATE"));
    lines.push(rule.clone());
    lines.push(format!(
        "Certificate No: TC-{}    Date of issue: {}",
        student.id.to_string().trim_start_matches("stu-"),
        settings.format_date(issued_on)
    ));
    lines.push(String::new());

    let items = [
        ("Name of student", student.name.clone()),
        (
            "Admission number",
            or_na(student.admission_number.as_deref().unwrap_or("")).to_string(),
        ),
        ("Parent/Guardian", or_na(&student.guardian_name).to_string()),
        ("Date of birth", date_or_na(settings, student.date_of_birth)),
        ("Date of admission", date_or_na(settings, student.admission_date)),
        ("Class last studied", or_na(&student.class_label()).to_string()),
        ("Date of leaving", date_or_na(settings, student.leaving_date)),
        ("Fee dues", dues),
    ];
    for (number, (label, value)) in items.iter().enumerate() {
        lines.push(format!("{:>2}. {:<20}: {}", number + 1, label, value));
    }

    lines.push(String::new());
    lines.push(String::new());
    lines.push(format!(
        "{:<32}{:>32}",
        "Prepared by", "Principal"
    ));
    lines.push(rule);

    Ok(lines.join("\n") + "\n")
}
