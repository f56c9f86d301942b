//! Error types for testdb
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using TestDbError
pub type Result<T> = std::result::Result<T, TestDbError>;

/// Unified error type for testdb operations
#[derive(Debug, Error)]
pub enum TestDbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("malformed content in {}: {detail}", path.display())]
    Format { path: PathBuf, detail: String },

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("validation failed: {0}")]
    Validation(String),
}

impl TestDbError {
    /// Build a `Format` error for malformed content in the given file.
    pub fn format(path: impl Into<PathBuf>, detail: impl ToString) -> Self {
        Self::Format {
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}
