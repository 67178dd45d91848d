//! Document CLI commands

use chrono::Utc;
use clap::Subcommand;
use std::path::PathBuf;

use super::parse_optional_date;
use crate::config::Settings;
use crate::display::{format_employee_id_card, format_student_id_card, format_transfer_certificate};
use crate::error::{SchoolError, SchoolResult};
use crate::services::{EmployeeService, LedgerService, StudentService};
use crate::storage::Storage;

/// Document subcommands
#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Student identity card
    IdCard {
        /// Admission number, name or ID
        student: String,
        /// Write to a file instead of the terminal
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Staff identity card
    StaffCard {
        /// Name, phone or ID
        employee: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Transfer certificate for a student who has left
    Tc {
        /// Admission number, name or ID
        student: String,
        /// Issue date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a document command
pub fn handle_document_command(
    storage: &Storage,
    settings: &Settings,
    cmd: DocumentCommands,
) -> SchoolResult<()> {
    let students = StudentService::new(storage);

    let (text, output) = match cmd {
        DocumentCommands::IdCard { student, output } => {
            let student = students.require(&student)?;
            (format_student_id_card(settings, &student), output)
        }
        DocumentCommands::StaffCard { employee, output } => {
            let employee = EmployeeService::new(storage).require(&employee)?;
            (format_employee_id_card(settings, &employee), output)
        }
        DocumentCommands::Tc {
            student,
            date,
            output,
        } => {
            let student = students.require(&student)?;
            let summary = LedgerService::new(storage).summary_for(&student)?;
            let issued_on = parse_optional_date(date)?.unwrap_or_else(|| Utc::now().date_naive());
            (
                format_transfer_certificate(settings, &student, &summary, issued_on)?,
                output,
            )
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &text).map_err(|e| {
                SchoolError::Export(format!("Failed to write {}: {}", path.display(), e))
            })?;
            println!("Written to {}", path.display());
        }
        None => print!("{}", text),
    }

    Ok(())
}
