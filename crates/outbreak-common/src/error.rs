//! Error types for Project Outbreak.

use thiserror::Error;

use crate::SchemaVersion;

/// Top-level error type for Outbreak operations.
#[derive(Debug, Error)]
pub enum OutbreakError {
    /// Data file contents failed validation
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Version the reader supports
        expected: SchemaVersion,
        /// Version found in the data
        actual: SchemaVersion,
    },
}

/// Result type alias for Outbreak operations.
pub type OutbreakResult<T> = Result<T, OutbreakError>;
