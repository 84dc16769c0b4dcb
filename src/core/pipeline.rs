//! Batch transform orchestration
//!
//! Runs the full expand → aggregate → enrich transform over one batch of
//! attendance records and reports what happened. The transform is a pure
//! function of (records, configuration); all I/O stays in the adapters.

use crate::core::aggregate::aggregate;
use crate::core::enrich::Enricher;
use crate::core::expand::expand;
use crate::domain::attendance::AttendanceRecord;
use crate::domain::census::{CensusRow, HourFact};
use crate::domain::result::Result;
use chrono::NaiveDate;
use std::time::{Duration, Instant};

/// Summary of one pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Attendance records received from the source
    pub records_ingested: usize,

    /// Records dropped as malformed (only when skipping is enabled)
    pub records_skipped: usize,

    /// Hour facts produced by expansion
    pub facts_expanded: usize,

    /// Aggregated census rows produced
    pub rows_produced: usize,

    /// Minimum week-starting date across the output rows
    ///
    /// The persistence layer replaces every stored week from this date
    /// onward, so re-running a window fully supersedes prior results.
    pub earliest_week_starting: Option<NaiveDate>,

    /// Duration of the transform
    pub duration: Duration,
}

impl RunSummary {
    /// Create a new empty run summary
    pub fn new() -> Self {
        Self {
            records_ingested: 0,
            records_skipped: 0,
            facts_expanded: 0,
            rows_produced: 0,
            earliest_week_starting: None,
            duration: Duration::from_secs(0),
        }
    }

    /// Check whether every ingested record contributed to the output
    pub fn is_complete(&self) -> bool {
        self.records_skipped == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            records_ingested = self.records_ingested,
            records_skipped = self.records_skipped,
            facts_expanded = self.facts_expanded,
            rows_produced = self.rows_produced,
            earliest_week_starting = ?self.earliest_week_starting,
            duration_ms = self.duration.as_millis(),
            "Census transform completed"
        );

        if self.records_skipped > 0 {
            tracing::warn!(
                records_skipped = self.records_skipped,
                "Some attendance records were skipped as malformed"
            );
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Output of one pipeline run: the census rows plus the run summary
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Enriched census rows in ascending key order
    pub rows: Vec<CensusRow>,

    /// What happened during the transform
    pub summary: RunSummary,
}

/// The expand → aggregate → enrich transform over one batch
#[derive(Debug, Clone)]
pub struct CensusPipeline {
    enricher: Enricher,

    /// When true, a malformed record is logged and dropped instead of
    /// aborting the run
    skip_invalid_records: bool,
}

impl CensusPipeline {
    /// Creates a pipeline with the given enrichment mappings
    pub fn new(enricher: Enricher, skip_invalid_records: bool) -> Self {
        Self {
            enricher,
            skip_invalid_records,
        }
    }

    /// Runs the transform over a batch of attendance records
    ///
    /// # Errors
    ///
    /// Returns the first `CensusError::DataFormat` encountered unless
    /// `skip_invalid_records` is enabled, in which case offending records
    /// are logged, counted in the summary, and dropped.
    pub fn run(&self, records: &[AttendanceRecord]) -> Result<PipelineOutput> {
        let started = Instant::now();
        let mut summary = RunSummary::new();
        summary.records_ingested = records.len();

        let mut facts: Vec<HourFact> = Vec::new();
        for record in records {
            match expand(record) {
                Ok(expansion) => facts.extend(expansion),
                Err(e) if self.skip_invalid_records => {
                    tracing::warn!(
                        site_code = %record.site_code,
                        department_type_id = %record.department_type_id,
                        error = %e,
                        "Skipping malformed attendance record"
                    );
                    summary.records_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        summary.facts_expanded = facts.len();

        let counts = aggregate(facts);
        let rows = self.enricher.enrich_all(counts);

        summary.rows_produced = rows.len();
        summary.earliest_week_starting = rows.iter().map(|r| r.date_weekstarting).min();
        summary.duration = started.elapsed();

        Ok(PipelineOutput { rows, summary })
    }
}
