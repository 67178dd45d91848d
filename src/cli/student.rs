//! Student CLI commands
//!
//! Implements CLI commands for student records and fee terms.

use chrono::Utc;
use clap::Subcommand;

use super::{parse_date, parse_optional_date, parse_optional_money};
use crate::config::Settings;
use crate::display::{format_student_list, format_student_profile};
use crate::error::SchoolResult;
use crate::services::{CreateStudentInput, LedgerService, StudentService, UpdateStudentInput};
use crate::storage::Storage;

/// Student subcommands
#[derive(Subcommand)]
pub enum StudentCommands {
    /// Admit a new student
    Add {
        /// Student name
        name: String,
        /// Class or grade (e.g. 8, LKG)
        #[arg(short, long)]
        class: Option<String>,
        /// Section (e.g. B)
        #[arg(short, long)]
        section: Option<String>,
        /// Roll number
        #[arg(short, long)]
        roll: Option<u32>,
        /// Admission number
        #[arg(short = 'n', long)]
        admission_no: Option<String>,
        /// Parent or guardian name
        #[arg(short, long)]
        guardian: Option<String>,
        /// Guardian phone number
        #[arg(short, long)]
        phone: Option<String>,
        /// Home address
        #[arg(long)]
        address: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        /// Admission date (YYYY-MM-DD, default today)
        #[arg(long)]
        admitted: Option<String>,
        /// Agreed fees for the session (e.g. 12500)
        #[arg(short, long, allow_hyphen_values = true)]
        fees: Option<String>,
        /// Unpaid amount carried over from earlier sessions
        #[arg(short, long, allow_hyphen_values = true)]
        back_logs: Option<String>,
    },
    /// List students
    List {
        /// Only this class
        #[arg(short, long)]
        class: Option<String>,
        /// Include students who have left
        #[arg(short, long)]
        all: bool,
    },
    /// Show a student's profile and fee ledger
    Show {
        /// Admission number, name or ID
        student: String,
    },
    /// Edit contact or placement details
    Edit {
        /// Admission number, name or ID
        student: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        class: Option<String>,
        #[arg(short, long)]
        section: Option<String>,
        #[arg(short, long)]
        roll: Option<u32>,
        #[arg(short, long)]
        guardian: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
    },
    /// Change agreed fees or back logs
    Fees {
        /// Admission number, name or ID
        student: String,
        /// New agreed fees
        #[arg(short, long, allow_hyphen_values = true)]
        agreed: Option<String>,
        /// New back logs
        #[arg(short, long, allow_hyphen_values = true)]
        back_logs: Option<String>,
    },
    /// Mark a student as having left the school
    Leave {
        /// Admission number, name or ID
        student: String,
        /// Leaving date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Delete a student record
    Delete {
        /// Admission number, name or ID
        student: String,
        /// Also delete the student's fee records
        #[arg(long)]
        force: bool,
    },
}

impl StudentCommands {
    /// Whether the command changes stored records
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::List { .. } | Self::Show { .. })
    }
}

/// Handle a student command
pub fn handle_student_command(
    storage: &Storage,
    settings: &Settings,
    cmd: StudentCommands,
) -> SchoolResult<()> {
    let service = StudentService::new(storage);

    match cmd {
        StudentCommands::Add {
            name,
            class,
            section,
            roll,
            admission_no,
            guardian,
            phone,
            address,
            dob,
            admitted,
            fees,
            back_logs,
        } => {
            let student = service.create(CreateStudentInput {
                name,
                class,
                section,
                roll_number: roll,
                admission_number: admission_no,
                guardian_name: guardian,
                phone,
                address,
                date_of_birth: parse_optional_date(dob)?,
                admission_date: parse_optional_date(admitted)?,
                total_agreed_fees: parse_optional_money(fees)?,
                back_logs: parse_optional_money(back_logs)?,
            })?;

            println!("Added student: {}", student);
            println!(
                "  Fees: {} (back logs {})",
                settings.format_money(student.total_agreed_fees),
                settings.format_money(student.back_logs)
            );
            println!("  ID: {}", student.id);
        }

        StudentCommands::List { class, all } => {
            let students = service.list(class.as_deref(), all)?;
            println!("{}", format_student_list(&students));
        }

        StudentCommands::Show { student } => {
            let student = service.require(&student)?;
            let ledger = LedgerService::new(storage);
            let summary = ledger.summary_for(&student)?;
            let history = ledger.payment_history(&student)?;
            print!(
                "{}",
                format_student_profile(settings, &student, &summary, &history)
            );
        }

        StudentCommands::Edit {
            student,
            name,
            class,
            section,
            roll,
            guardian,
            phone,
            address,
            dob,
        } => {
            let found = service.require(&student)?;
            let input = UpdateStudentInput {
                name,
                class,
                section,
                roll_number: roll,
                guardian_name: guardian,
                phone,
                address,
                date_of_birth: parse_optional_date(dob)?,
            };
            if input.is_empty() {
                println!("No changes specified. See 'schoolbook student edit --help'.");
                return Ok(());
            }
            let updated = service.update(found.id, input)?;
            println!("Updated student: {}", updated);
        }

        StudentCommands::Fees {
            student,
            agreed,
            back_logs,
        } => {
            let found = service.require(&student)?;
            let agreed = parse_optional_money(agreed)?;
            let back_logs = parse_optional_money(back_logs)?;
            if agreed.is_none() && back_logs.is_none() {
                println!("No changes specified. Use --agreed or --back-logs.");
                return Ok(());
            }

            let updated = service.set_fee_terms(found.id, agreed, back_logs)?;
            let summary = LedgerService::new(storage).summary_for(&updated)?;
            println!("Updated fee terms for {}", updated.name);
            println!(
                "  Total: {}  Paid: {}  Due: {}  ({})",
                settings.format_money(summary.total_liability),
                settings.format_money(summary.paid_total),
                settings.format_money(summary.due_amount),
                summary.status
            );
        }

        StudentCommands::Leave { student, date } => {
            let found = service.require(&student)?;
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => Utc::now().date_naive(),
            };
            let left = service.deactivate(found.id, date)?;
            println!(
                "{} marked as left on {}",
                left.name,
                settings.format_date(date)
            );
        }

        StudentCommands::Delete { student, force } => {
            let found = service.require(&student)?;
            let deleted = service.delete(found.id, force)?;
            println!("Deleted student: {}", deleted.name);
        }
    }

    Ok(())
}
