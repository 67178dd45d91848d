//! Path management for SchoolBook
//!
//! ## Path Resolution Order
//!
//! 1. `SCHOOLBOOK_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory reported by `directories`
//!    (`~/.config/schoolbook` on Linux, `%APPDATA%\schoolbook\config` on
//!    Windows, `~/Library/Application Support/schoolbook` on macOS)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::SchoolError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "SCHOOLBOOK_DATA_DIR";

/// Manages all paths used by SchoolBook
#[derive(Debug, Clone)]
pub struct SchoolPaths {
    base_dir: PathBuf,
}

impl SchoolPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, SchoolError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "schoolbook")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    SchoolError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory (tests, portable installs)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the record files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn students_file(&self) -> PathBuf {
        self.data_dir().join("students.json")
    }

    pub fn employees_file(&self) -> PathBuf {
        self.data_dir().join("employees.json")
    }

    pub fn fees_file(&self) -> PathBuf {
        self.data_dir().join("fees.json")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> Result<(), SchoolError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SchoolError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| SchoolError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Whether `schoolbook init` has been run here
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
