//! Domain error types
//!
//! This module defines the error hierarchy for the census pipeline.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main census error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific failure categories and provides context for error
/// handling.
#[derive(Debug, Error)]
pub enum CensusError {
    /// Configuration-related errors
    ///
    /// Malformed or missing window specification, unsupported window unit,
    /// or missing/misaligned site and department mappings. Never retried;
    /// the run aborts before any record is processed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Attendance data that cannot be interpreted
    ///
    /// Unparsable date/time fields or a departure that precedes the
    /// arrival. Invalid data is never coerced into a fabricated hour.
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// Database-related errors (source or target)
    #[error("Database error: {0}")]
    Database(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for CensusError {
    fn from(err: std::io::Error) -> Self {
        CensusError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CensusError {
    fn from(err: serde_json::Error) -> Self {
        CensusError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CensusError {
    fn from(err: toml::de::Error) -> Self {
        CensusError::Configuration(format!("TOML parse error: {err}"))
    }
}
