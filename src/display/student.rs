//! Student display formatting
//!
//! Student lists as tables and the full profile view with the fee ledger.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{date_or_na, or_na};
use crate::config::Settings;
use crate::models::{FeeRecord, LedgerSummary, Student};

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Adm No")]
    admission_number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Roll")]
    roll: String,
    #[tabled(rename = "Guardian")]
    guardian: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Status")]
    state: String,
}

/// Format a list of students as a table
pub fn format_student_list(students: &[Student]) -> String {
    if students.is_empty() {
        return "No students found.".to_string();
    }

    let rows: Vec<StudentRow> = students
        .iter()
        .map(|s| StudentRow {
            id: s.id.to_string(),
            admission_number: or_na(s.admission_number.as_deref().unwrap_or("")).to_string(),
            name: s.name.clone(),
            class: or_na(&s.class_label()).to_string(),
            roll: s
                .roll_number
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
            guardian: or_na(&s.guardian_name).to_string(),
            phone: or_na(&s.phone).to_string(),
            state: if s.active { String::new() } else { "Left".to_string() },
        })
        .collect();

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push_str(&format!("\n{} student(s)\n", students.len()));
    output
}

/// Student details, ledger summary and payment history
pub fn format_student_profile(
    settings: &Settings,
    student: &Student,
    summary: &LedgerSummary,
    history: &[FeeRecord],
) -> String {
    let money = |m| settings.format_money(m);
    let mut output = String::new();

    output.push_str(&format!("Student: {}\n", student.name));
    output.push_str(&format!("  ID:             {}\n", student.id));
    output.push_str(&format!(
        "  Admission No:   {}\n",
        or_na(student.admission_number.as_deref().unwrap_or(""))
    ));
    output.push_str(&format!("  Class:          {}\n", or_na(&student.class_label())));
    output.push_str(&format!(
        "  Roll No:        {}\n",
        student
            .roll_number
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    ));
    output.push_str(&format!("  Guardian:       {}\n", or_na(&student.guardian_name)));
    output.push_str(&format!("  Phone:          {}\n", or_na(&student.phone)));
    output.push_str(&format!("  Address:        {}\n", or_na(&student.address)));
    output.push_str(&format!(
        "  Date of Birth:  {}\n",
        date_or_na(settings, student.date_of_birth)
    ));
    output.push_str(&format!(
        "  Admitted:       {}\n",
        date_or_na(settings, student.admission_date)
    ));
    if !student.active {
        output.push_str(&format!(
            "  Left:           {}\n",
            date_or_na(settings, student.leaving_date)
        ));
    }

    output.push('\n');
    output.push_str("Fee Ledger\n");
    output.push_str(&format!("  Agreed Fees:    {}\n", money(summary.total_agreed)));
    output.push_str(&format!("  Back Logs:      {}\n", money(student.back_logs)));
    output.push_str(&format!("  Total:          {}\n", money(summary.total_liability)));
    output.push_str(&format!("  Paid:           {}\n", money(summary.paid_total)));
    output.push_str(&format!("  Due:            {}\n", money(summary.due_amount)));
    if summary.overpaid_amount.is_positive() {
        output.push_str(&format!("  Overpaid:       {}\n", money(summary.overpaid_amount)));
    }
    output.push_str(&format!(
        "  Progress:       {} {}%\n",
        progress_bar(summary.progress_percent),
        summary.progress_percent
    ));
    output.push_str(&format!("  Status:         {}\n", summary.status));

    output.push('\n');
    if history.is_empty() {
        output.push_str("No payments recorded.\n");
    } else {
        output.push_str(&format!("Payment History ({})\n", summary.transaction_count));
        for fee in history {
            let note = if fee.note.is_empty() {
                String::new()
            } else {
                format!("  {}", fee.note)
            };
            output.push_str(&format!(
                "  {}  {:>12}  {:<13}  {}{}\n",
                settings.format_date(fee.date),
                money(fee.amount),
                fee.mode.to_string(),
                fee.id,
                note
            ));
        }
    }

    output
}

fn progress_bar(percent: u32) -> String {
    let filled = (percent.min(100) / 5) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}
