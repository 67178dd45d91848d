//! Custom error types for SchoolBook
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for SchoolBook operations
#[derive(Error, Debug)]
pub enum SchoolError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed values reaching the fee ledger (negative or unparsable amounts)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The lock gate refused access
    #[error("Locked: {0}")]
    Locked(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SchoolError {
    /// Create a "not found" error for students
    pub fn student_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Student",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for employees
    pub fn employee_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Employee",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for fee records
    pub fn fee_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Fee record",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an invalid input error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<std::io::Error> for SchoolError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for SchoolBook operations
pub type SchoolResult<T> = Result<T, SchoolError>;
