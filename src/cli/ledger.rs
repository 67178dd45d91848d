//! Ledger CLI commands
//!
//! Ledger overviews and the guardian messages built from them.

use chrono::{Datelike, NaiveDate, Utc};
use clap::Subcommand;

use super::parse_date;
use crate::config::Settings;
use crate::display::format_ledger_list;
use crate::error::{SchoolError, SchoolResult};
use crate::models::LedgerStatus;
use crate::services::messages::{compose_payment_confirmation, compose_reminder, latest_payment};
use crate::services::{FeeService, LedgerService, StudentService};
use crate::storage::Storage;

/// Ledger subcommands
#[derive(Subcommand)]
pub enum LedgerCommands {
    /// Fee status of every student, with school totals
    List {
        /// Only students with this status (paid, partial, unpaid, no-fees)
        #[arg(short, long)]
        status: Option<String>,
        /// Include students who have left
        #[arg(short, long)]
        all: bool,
    },
    /// Compose a fee reminder for a student's guardian
    Remind {
        /// Admission number, name or ID
        student: String,
    },
    /// Compose a payment confirmation
    Receipt {
        /// Admission number, name or ID
        student: String,
        /// Fee record to confirm (default: most recent payment)
        #[arg(short, long)]
        fee: Option<String>,
    },
    /// Total collected in a date range
    Collected {
        /// Start date (YYYY-MM-DD, default first of this month)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD, default today)
        #[arg(long)]
        to: Option<String>,
    },
}

/// Handle a ledger command
pub fn handle_ledger_command(
    storage: &Storage,
    settings: &Settings,
    cmd: LedgerCommands,
) -> SchoolResult<()> {
    let ledger = LedgerService::new(storage);
    let students = StudentService::new(storage);

    match cmd {
        LedgerCommands::List { status, all } => {
            let status = status
                .map(|s| {
                    LedgerStatus::parse(&s).ok_or_else(|| {
                        SchoolError::InvalidInput(format!(
                            "Invalid status: '{}'. Valid: paid, partial, unpaid, no-fees",
                            s
                        ))
                    })
                })
                .transpose()?;
            let ledgers = ledger.list(all, status)?;
            print!("{}", format_ledger_list(settings, &ledgers)?);
        }

        LedgerCommands::Remind { student } => {
            let student = students.require(&student)?;
            let summary = ledger.summary_for(&student)?;
            println!("{}", compose_reminder(settings, &student, &summary)?);
        }

        LedgerCommands::Receipt { student, fee } => {
            let student = students.require(&student)?;
            let summary = ledger.summary_for(&student)?;
            let fee = match fee {
                Some(id) => FeeService::new(storage).require(&id)?,
                None => {
                    let history = ledger.payment_history(&student)?;
                    latest_payment(&history).cloned().ok_or_else(|| {
                        SchoolError::Validation(format!(
                            "{} has no recorded payments",
                            student.name
                        ))
                    })?
                }
            };
            println!(
                "{}",
                compose_payment_confirmation(settings, &student, &fee, &summary)?
            );
        }

        LedgerCommands::Collected { from, to } => {
            let today = Utc::now().date_naive();
            let start = match from {
                Some(d) => parse_date(&d)?,
                None => NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today),
            };
            let end = match to {
                Some(d) => parse_date(&d)?,
                None => today,
            };
            if start > end {
                return Err(SchoolError::InvalidInput(
                    "--from must not be after --to".into(),
                ));
            }

            let total = ledger.collected_between(start, end)?;
            println!(
                "Collected {} between {} and {}",
                settings.format_money(total),
                settings.format_date(start),
                settings.format_date(end)
            );
        }
    }

    Ok(())
}
