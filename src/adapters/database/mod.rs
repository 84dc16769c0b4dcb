//! Database abstraction layer
//!
//! This module provides trait-based contracts for the ingestion and
//! persistence boundaries, keeping the core transform free of I/O and
//! allowing tests to substitute in-memory implementations.

pub mod traits;

pub use traits::{AttendanceSource, CensusStore};
