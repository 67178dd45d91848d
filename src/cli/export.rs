//! CLI commands for data export

use crate::config::Settings;
use crate::error::{SchoolError, SchoolResult};
use crate::export::{csv, json, yaml};
use crate::services::LedgerService;
use crate::storage::Storage;
use clap::{Subcommand, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Full export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export all data to a file
    All {
        /// Output file path
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export the fee ledger of every student to CSV
    Ledger {
        /// Output file path
        output: PathBuf,

        /// Include students who have left
        #[arg(short, long)]
        all: bool,
    },

    /// Export every fee record to CSV
    Fees {
        /// Output file path
        output: PathBuf,
    },

    /// Show what an export would contain without writing files
    Info,
}

fn create_file(output: &Path) -> SchoolResult<BufWriter<File>> {
    let file = File::create(output).map_err(|e| {
        SchoolError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> SchoolResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let mut writer = create_file(&output)?;
            match format {
                ExportFormat::Json => json::export_full_json(storage, settings, &mut writer, pretty)?,
                ExportFormat::Yaml => yaml::export_full_yaml(storage, settings, &mut writer)?,
            }
            tracing::info!(path = %output.display(), ?format, "full export written");
            println!("Full database exported to: {}", output.display());
        }

        ExportCommands::Ledger { output, all } => {
            let ledgers = LedgerService::new(storage).list(all, None)?;
            csv::export_ledger_csv(&ledgers, create_file(&output)?)?;
            println!(
                "Exported {} student ledgers to: {}",
                ledgers.len(),
                output.display()
            );
        }

        ExportCommands::Fees { output } => {
            csv::export_fees_csv(storage, create_file(&output)?)?;
            println!(
                "Exported {} fee records to: {}",
                storage.fees.count()?,
                output.display()
            );
        }

        ExportCommands::Info => {
            let export = json::FullExport::from_storage(storage, settings)?;
            let meta = &export.metadata;
            println!("Export Information");
            println!("==================");
            println!("Schema version:  {}", export.schema_version);
            println!("School:          {}", export.school_name);
            println!(
                "Students:        {} ({} active)",
                meta.student_count, meta.active_student_count
            );
            println!("Employees:       {}", meta.employee_count);
            println!(
                "Fee records:     {} ({} deleted)",
                meta.fee_count, meta.deleted_fee_count
            );
            println!(
                "Collected:       {}",
                settings.format_money(meta.total_collected)
            );
            if let (Some(first), Some(last)) = (&meta.earliest_fee, &meta.latest_fee) {
                println!("Date range:      {} to {}", first, last);
            }
        }
    }

    Ok(())
}
