//! Error types for segkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SegKvError
pub type Result<T> = std::result::Result<T, SegKvError>;

/// Unified error type for segkv operations
#[derive(Debug, Error)]
pub enum SegKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    /// A trailer points at or before the header, or a payload cannot be
    /// split into well-formed, ordered key/value pairs.
    #[error("Corrupt segment: {0}")]
    CorruptSegment(String),

    /// A key or value contains a reserved separator or the tombstone byte.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SegKvError {
    /// Shorthand for a `CorruptSegment` error
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        SegKvError::CorruptSegment(msg.into())
    }
}
