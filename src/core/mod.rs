//! Core business logic for the census pipeline.
//!
//! This module contains the temporal expansion and aggregation engine and
//! its orchestration. Everything here is pure and single-pass: no I/O, no
//! shared mutable state.
//!
//! # Modules
//!
//! - [`window`] - Reporting window resolution and week-boundary snapping
//! - [`expand`] - Per-record hourly expansion
//! - [`aggregate`] - Grouped census summation
//! - [`calendar`] - Financial calendar and week-boundary mappings
//! - [`enrich`] - Label and calendar enrichment of aggregated rows
//! - [`pipeline`] - Whole-batch orchestration and run reporting
//!
//! # Pipeline Workflow
//!
//! 1. **Resolve window**: turn the configured window into a Monday cutoff
//! 2. **Ingest**: fetch attendance rows arriving on or after the cutoff
//! 3. **Expand**: one fact per patient-hour from arrival to departure
//! 4. **Aggregate**: sum presence/arrival flags per (date, hour, site,
//!    department)
//! 5. **Enrich**: attach financial calendar fields and configured labels
//! 6. **Persist**: replace every stored week the new output covers
//!
//! # Example
//!
//! ```rust
//! use ed_census::core::enrich::Enricher;
//! use ed_census::core::pipeline::CensusPipeline;
//! use ed_census::domain::AttendanceRecord;
//! use std::collections::BTreeMap;
//!
//! # fn example() -> ed_census::domain::Result<()> {
//! let record = AttendanceRecord::from_raw(
//!     "RAL26", "01",
//!     "2024-01-01", "08:15:00",
//!     "2024-01-01", "10:00:00",
//! )?;
//!
//! let enricher = Enricher::new(BTreeMap::new(), BTreeMap::new());
//! let pipeline = CensusPipeline::new(enricher, false);
//! let output = pipeline.run(&[record])?;
//!
//! assert_eq!(output.summary.rows_produced, 3);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod calendar;
pub mod enrich;
pub mod expand;
pub mod pipeline;
pub mod window;
