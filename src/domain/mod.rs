//! Domain models and types for the census pipeline.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`SiteCode`], [`DepartmentTypeId`])
//! - **Domain models** ([`AttendanceRecord`], [`HourFact`], [`CensusRow`])
//! - **Error types** ([`CensusError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so the two ID kinds cannot be mixed:
//!
//! ```rust
//! use ed_census::domain::{SiteCode, DepartmentTypeId};
//!
//! # fn example() -> Result<(), String> {
//! let site = SiteCode::new("RAL26")?;
//! let dept = DepartmentTypeId::new("01")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: SiteCode = dept;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, CensusError>`](Result):
//!
//! ```rust
//! use ed_census::domain::{AttendanceRecord, Result};
//!
//! fn example() -> Result<AttendanceRecord> {
//!     AttendanceRecord::from_raw(
//!         "RAL26", "01",
//!         "2024-01-01", "08:15:00",
//!         "2024-01-01", "10:00:00",
//!     )
//! }
//! ```

pub mod attendance;
pub mod census;
pub mod context;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use attendance::AttendanceRecord;
pub use census::{CensusCounts, CensusKey, CensusRow, HourFact};
pub use errors::CensusError;
pub use ids::{DepartmentTypeId, SiteCode};
pub use result::Result;
