//! Audit trail for SchoolBook
//!
//! Every create, update and delete of a student, employee or fee record is
//! appended to `audit.log` as one JSON object per line, with before/after
//! snapshots of the record.
//!
//! ```rust,ignore
//! use schoolbook::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::FeeRecord,
//!     fee.id.to_string(),
//!     Some(student.name.clone()),
//!     &fee,
//! ))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
