//! Export module for SchoolBook
//!
//! - CSV: ledger summaries and fee records (spreadsheet-compatible)
//! - JSON: machine-readable full database export
//! - YAML: human-readable full database export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_fees_csv, export_ledger_csv};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
