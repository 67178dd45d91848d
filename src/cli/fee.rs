//! Fee CLI commands
//!
//! Payments, charges and soft deletion of fee records.

use clap::Subcommand;

use super::{parse_money, parse_optional_date};
use crate::config::Settings;
use crate::display::format_fee_list;
use crate::error::{SchoolError, SchoolResult};
use crate::models::{FeeStatus, PaymentMode};
use crate::services::{CreateFeeInput, FeeService, LedgerService, StudentService};
use crate::storage::Storage;

fn parse_mode(value: &str) -> SchoolResult<PaymentMode> {
    PaymentMode::parse(value).ok_or_else(|| {
        SchoolError::InvalidInput(format!(
            "Invalid payment mode: '{}'. Valid modes: cash, upi, bank, cheque, other",
            value
        ))
    })
}

/// Fee subcommands
#[derive(Subcommand)]
pub enum FeeCommands {
    /// Record a payment received
    Pay {
        /// Admission number, name or ID of the student
        student: String,
        /// Amount received (e.g. 2500 or ₹2,500)
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Payment date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// cash, upi, bank, cheque or other
        #[arg(short, long, default_value = "cash")]
        mode: String,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Add a pending or overdue charge
    Charge {
        /// Admission number, name or ID of the student
        student: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Due date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Mark the charge as already overdue
        #[arg(long)]
        overdue: bool,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Mark a pending charge as paid
    MarkPaid {
        /// Fee record ID
        fee: String,
        /// Payment date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long, default_value = "cash")]
        mode: String,
    },
    /// List a student's fee records
    List {
        /// Admission number, name or ID of the student
        student: String,
        /// Include deleted records
        #[arg(short, long)]
        all: bool,
    },
    /// Delete a fee record (it can be restored)
    Delete {
        /// Fee record ID
        fee: String,
    },
    /// Restore a deleted fee record
    Restore {
        /// Fee record ID
        fee: String,
    },
}

impl FeeCommands {
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::List { .. })
    }
}

/// Handle a fee command
pub fn handle_fee_command(storage: &Storage, settings: &Settings, cmd: FeeCommands) -> SchoolResult<()> {
    let service = FeeService::new(storage);
    let students = StudentService::new(storage);

    match cmd {
        FeeCommands::Pay {
            student,
            amount,
            date,
            mode,
            note,
        } => {
            let student = students.require(&student)?;
            let fee = service.create(CreateFeeInput {
                student_id: student.id,
                amount: parse_money(&amount)?,
                date: parse_optional_date(date)?,
                status: FeeStatus::Paid,
                mode: Some(parse_mode(&mode)?),
                note,
            })?;

            let summary = LedgerService::new(storage).summary_for(&student)?;
            println!(
                "Recorded {} from {} on {}",
                settings.format_money(fee.amount),
                student.name,
                settings.format_date(fee.date)
            );
            println!(
                "  Due now: {}  ({})",
                settings.format_money(summary.due_amount),
                summary.status
            );
            println!("  Receipt: {}", fee.id);
        }

        FeeCommands::Charge {
            student,
            amount,
            date,
            overdue,
            note,
        } => {
            let student = students.require(&student)?;
            let fee = service.create(CreateFeeInput {
                student_id: student.id,
                amount: parse_money(&amount)?,
                date: parse_optional_date(date)?,
                status: if overdue {
                    FeeStatus::Overdue
                } else {
                    FeeStatus::Pending
                },
                mode: None,
                note,
            })?;
            println!(
                "Added {} charge of {} for {} ({})",
                fee.status,
                settings.format_money(fee.amount),
                student.name,
                fee.id
            );
        }

        FeeCommands::MarkPaid { fee, date, mode } => {
            let fee = service.mark_paid(&fee, parse_optional_date(date)?, parse_mode(&mode)?)?;
            println!(
                "Marked {} as paid on {}",
                fee.id,
                settings.format_date(fee.date)
            );
        }

        FeeCommands::List { student, all } => {
            let student = students.require(&student)?;
            let fees = service.list_for_student(student.id, all)?;
            println!("Fee records for {}", student);
            println!("{}", format_fee_list(settings, &fees));
        }

        FeeCommands::Delete { fee } => {
            let fee = service.delete(&fee)?;
            println!("Deleted fee record {} (restore with 'schoolbook fee restore {}')", fee.id, fee.id);
        }

        FeeCommands::Restore { fee } => {
            let fee = service.restore(&fee)?;
            println!("Restored fee record {}", fee.id);
        }
    }

    Ok(())
}
