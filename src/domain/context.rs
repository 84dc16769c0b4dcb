//! Error context extension trait
//!
//! This module provides a context extension trait similar to `anyhow::Context`
//! that works with `Result<T, CensusError>`. This allows adding rich context
//! to errors throughout the library code while maintaining type safety.
//!
//! # Examples
//!
//! ```rust
//! use ed_census::domain::{CensusError, Result};
//! use ed_census::domain::context::ResultExt;
//!
//! fn read_file(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .context(format!("Failed to read file: {}", path))
//! }
//! ```

use crate::domain::errors::CensusError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
///
/// This trait provides `.context()` and `.with_context()` methods
/// for adding contextual information to errors, similar to `anyhow::Context`,
/// while keeping the `CensusError` type throughout the library code.
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// The context is evaluated eagerly; use `.with_context()` if the
    /// context string is expensive to compute.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// The context is computed only if an error occurs.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CensusError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| {
            let base_error = e.into();
            CensusError::Other(format!("{context}: {base_error}"))
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let base_error = e.into();
            let context = f();
            CensusError::Other(format!("{context}: {base_error}"))
        })
    }
}
