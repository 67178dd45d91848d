//! SchoolBook - student records and fee ledger for small schools
//!
//! This library provides the core functionality for the SchoolBook command
//! line tool: student and staff records, fee payments, and the per-student
//! fee ledger (liability, payments, dues and status) that reminders,
//! receipts, certificates and exports are built from.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (students, employees, fee records, ledger)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer, including the ledger and lock gate
//! - `audit`: Audit logging system
//! - `display`: Tables, profiles and printable documents
//! - `export`: CSV, JSON and YAML export
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use schoolbook::config::{SchoolPaths, Settings};
//! use schoolbook::services::LedgerService;
//! use schoolbook::storage::Storage;
//!
//! let paths = SchoolPaths::new()?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//! let ledgers = LedgerService::new(&storage).list(false, None)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::SchoolError;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "schoolbook=warn";

/// Initializes diagnostic logging to stderr. Safe to call more than once.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        // A subscriber may already be installed by an embedding program
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
