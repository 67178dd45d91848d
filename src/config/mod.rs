//! Configuration for SchoolBook
//!
//! - `paths`: where settings, records and the audit log live
//! - `settings`: school details, formatting preferences and the lock gate

pub mod paths;
pub mod settings;

pub use paths::SchoolPaths;
pub use settings::{LockSettings, Settings};
