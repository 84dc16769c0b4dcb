//! Database abstraction traits
//!
//! This module defines the boundary contracts the core consumes and
//! produces: where attendance records come from and where census rows go.
//! The core never sees a connection; implementations own all I/O.

use crate::domain::attendance::AttendanceRecord;
use crate::domain::census::CensusRow;
use crate::domain::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of attendance records
///
/// Implementations fetch one batch of attendance rows already filtered to
/// arrivals on or after the cutoff date.
#[async_trait]
pub trait AttendanceSource: Send + Sync {
    /// Test the source connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Fetch every attendance arriving on or after `cutoff`
    ///
    /// # Errors
    ///
    /// Returns `CensusError::Database` on query failure, or
    /// `CensusError::DataFormat` for a malformed row when the source is not
    /// configured to skip them.
    async fn fetch_attendances(&self, cutoff: NaiveDate) -> Result<Vec<AttendanceRecord>>;
}

/// Destination for census rows
///
/// The census output is idempotent per complete week: a store replaces
/// every previously stored week the new output covers, so re-running a
/// window fully supersedes prior results.
#[async_trait]
pub trait CensusStore: Send + Sync {
    /// Test the target connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Ensure the target table exists, creating it if necessary
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be created or accessed.
    async fn ensure_table_exists(&self) -> Result<()>;

    /// Replace stored rows from `min_weekstarting` onward with `rows`
    ///
    /// Deletes every stored row whose `date_weekstarting` is on or after
    /// `min_weekstarting`, then inserts the new rows in chunks. With
    /// `dry_run` nothing is written.
    ///
    /// # Returns
    ///
    /// The number of rows inserted (zero in dry-run mode).
    ///
    /// # Errors
    ///
    /// Returns an error if the delete or any insert fails.
    async fn replace_weeks(
        &self,
        min_weekstarting: NaiveDate,
        rows: &[CensusRow],
        dry_run: bool,
    ) -> Result<u64>;
}
