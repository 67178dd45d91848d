//! Storage initialization
//!
//! First-run setup: directories, empty record files and default settings.

use crate::config::{paths::SchoolPaths, settings::Settings};
use crate::error::SchoolError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing record files and settings are left untouched.
pub fn initialize_storage(paths: &SchoolPaths, settings: &Settings) -> Result<(), SchoolError> {
    paths.ensure_directories()?;

    let empty_files = [
        (paths.students_file(), serde_json::json!({ "students": [] })),
        (paths.employees_file(), serde_json::json!({ "employees": [] })),
        (paths.fees_file(), serde_json::json!({ "fees": [] })),
    ];

    for (path, empty) in empty_files {
        if !path.exists() {
            write_json_atomic(&path, &empty)?;
        }
    }

    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    tracing::info!(base = %paths.base_dir().display(), "storage initialized");
    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &SchoolPaths) -> bool {
    !paths.is_initialized()
}
