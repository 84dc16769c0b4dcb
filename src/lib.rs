// ED Census - Hourly Emergency Department Occupancy ETL
// Copyright (c) 2025 ED Census Contributors
// Licensed under the MIT License

//! # ED Census - Hourly Occupancy ETL
//!
//! ED Census converts episodic emergency-department attendance records
//! (one row per patient visit, with arrival and departure timestamps) into
//! an hourly occupancy census per site and department: for every hour of
//! every day, how many patients were present and how many arrived.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** a human-specified reporting window to a Monday cutoff
//! - **Expanding** each attendance into one fact per hour of stay
//! - **Aggregating** facts into a per-(date, hour, site, department) census
//! - **Enriching** rows with the UK financial calendar and configured labels
//! - **Replacing** every stored week the new output covers in the target
//!
//! ## Architecture
//!
//! The crate follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (window, expand, aggregate, enrich, pipeline)
//! - [`adapters`] - External integrations (attendance source, census store)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use ed_census::core::enrich::Enricher;
//! use ed_census::core::pipeline::CensusPipeline;
//! use ed_census::domain::AttendanceRecord;
//! use std::collections::BTreeMap;
//!
//! # fn main() -> ed_census::domain::Result<()> {
//! let record = AttendanceRecord::from_raw(
//!     "RAL26", "01",
//!     "2024-01-01", "08:15:00",
//!     "2024-01-01", "10:00:00",
//! )?;
//!
//! let sites = BTreeMap::from([("RAL26".to_string(), "BH".to_string())]);
//! let departments =
//!     BTreeMap::from([("01".to_string(), "Emergency Department".to_string())]);
//!
//! let pipeline = CensusPipeline::new(Enricher::new(sites, departments), false);
//! let output = pipeline.run(&[record])?;
//!
//! // 08:15 arrival, 10:00 departure: hours 8, 9 and 10
//! assert_eq!(output.summary.rows_produced, 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Counting Rules
//!
//! Occupancy is measured by a fixed hourly snapshot: a patient counts as
//! present in an hour iff they were in the department at the top of that
//! hour. Arrivals are events counted against the hour in which they occur,
//! even when that hour's snapshot predates the event. The two measures
//! together give census and throughput:
//!
//! ```rust
//! use ed_census::core::expand::expand;
//! use ed_census::domain::AttendanceRecord;
//!
//! # fn main() -> ed_census::domain::Result<()> {
//! let record = AttendanceRecord::from_raw(
//!     "RAL26", "01",
//!     "2024-01-01", "08:15:00",
//!     "2024-01-01", "10:00:00",
//! )?;
//!
//! let facts: Vec<_> = expand(&record)?.collect();
//! // Arrived mid-hour: an arrival at 08:00 but not present at its snapshot
//! assert_eq!((facts[0].count_patients, facts[0].count_arrivals), (0, 1));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations use the [`domain::CensusError`] type:
//!
//! ```rust,no_run
//! use ed_census::domain::CensusError;
//!
//! fn example() -> Result<(), CensusError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = ed_census::config::load_config("census.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Structured logging uses the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!("Starting census run");
//! warn!(site_code = "RAL26", "No attendances found");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
