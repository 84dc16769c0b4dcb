//! PostgreSQL adapter
//!
//! Implements both boundary contracts against PostgreSQL: the attendance
//! extract table as an [`AttendanceSource`] and the reporting table as a
//! [`CensusStore`].
//!
//! [`AttendanceSource`]: crate::adapters::database::AttendanceSource
//! [`CensusStore`]: crate::adapters::database::CensusStore

pub mod client;
pub mod source;
pub mod store;

pub use client::PostgresClient;
pub use source::PostgresAttendanceSource;
pub use store::PostgresCensusStore;
