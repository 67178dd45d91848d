//! JSON Export functionality
//!
//! Exports the complete database to JSON format with schema versioning.

use crate::config::Settings;
use crate::error::{SchoolError, SchoolResult};
use crate::models::{Employee, FeeRecord, Money, Student};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub school_name: String,

    pub students: Vec<Student>,

    /// Staff records with PINs masked
    pub employees: Vec<Employee>,

    /// Every fee record, soft-deleted ones included
    pub fees: Vec<FeeRecord>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub student_count: usize,
    pub active_student_count: usize,
    pub employee_count: usize,
    pub fee_count: usize,
    pub deleted_fee_count: usize,

    /// Sum of paid, non-deleted records
    pub total_collected: Money,

    pub earliest_fee: Option<String>,
    pub latest_fee: Option<String>,
}

impl FullExport {
    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage, settings: &Settings) -> SchoolResult<Self> {
        let students = storage.students.get_all()?;
        let employees: Vec<Employee> = storage
            .employees
            .get_all()?
            .iter()
            .map(Employee::redacted)
            .collect();
        let fees = storage.fees.get_all()?;

        let metadata = ExportMetadata {
            student_count: students.len(),
            active_student_count: students.iter().filter(|s| s.active).count(),
            employee_count: employees.len(),
            fee_count: fees.len(),
            deleted_fee_count: fees.iter().filter(|f| f.is_deleted).count(),
            total_collected: Money::checked_sum(
                fees.iter()
                    .filter(|f| !f.is_deleted && f.is_paid())
                    .map(|f| f.amount),
            )
            .ok_or_else(|| {
                SchoolError::InvalidInput("total collected is too large to export".into())
            })?,
            earliest_fee: fees.iter().map(|f| f.date).min().map(|d| d.to_string()),
            latest_fee: fees.iter().map(|f| f.date).max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            school_name: settings.school_name.clone(),
            students,
            employees,
            fees,
            metadata,
        })
    }

    /// Check the schema version and that every fee belongs to a student
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let student_ids: HashSet<_> = self.students.iter().map(|s| s.id).collect();
        for fee in &self.fees {
            if !student_ids.contains(&fee.student_id) {
                return Err(format!(
                    "Fee record {} references unknown student {}",
                    fee.id, fee.student_id
                ));
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    settings: &Settings,
    writer: &mut W,
    pretty: bool,
) -> SchoolResult<()> {
    let export = FullExport::from_storage(storage, settings)?;
    export.validate().map_err(SchoolError::Export)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| SchoolError::Export(e.to_string()))?;

    Ok(())
}
