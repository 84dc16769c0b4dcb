//! Run command implementation
//!
//! This module implements the `run` command: resolve the reporting window,
//! ingest attendances, expand and aggregate them into the hourly census,
//! and replace the overlapping weeks in the target store.

use crate::adapters::database::traits::{AttendanceSource, CensusStore};
use crate::adapters::postgresql::{PostgresAttendanceSource, PostgresCensusStore};
use crate::config::load_config;
use crate::config::schema::WindowValue;
use crate::core::pipeline::CensusPipeline;
use crate::core::window::derive_cutoff_date;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Dry run mode - build the census but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Override the configured window (e.g. "2 weeks" or "14")
    #[arg(long)]
    pub window: Option<String>,

    /// Override the reference date the window counts back from (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting census run");

        // Load configuration
        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Apply CLI overrides
        if let Some(window) = &self.window {
            tracing::info!(window = %window, "Overriding window from CLI");
            config.window.spec = match window.parse::<u32>() {
                Ok(days) => WindowValue::Days(days),
                Err(_) => WindowValue::Text(window.clone()),
            };
        }
        if let Some(as_of) = &self.as_of {
            match as_of.parse() {
                Ok(date) => {
                    tracing::info!(as_of = %date, "Overriding reference date from CLI");
                    config.window.as_of = Some(date);
                }
                Err(e) => {
                    eprintln!("Invalid --as-of date '{as_of}': {e}");
                    return Ok(2);
                }
            }
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        // Re-validate after overrides
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        // Resolve the reporting window down to a Monday cutoff
        let spec = match config.window.window_spec() {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Invalid window: {e}");
                return Ok(2);
            }
        };
        let reference = config.window.reference_date();
        let cutoff = match derive_cutoff_date(&spec, reference) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to resolve window: {e}");
                return Ok(2);
            }
        };
        tracing::info!(window = %spec, reference = %reference, cutoff = %cutoff, "Window resolved");

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No data will be written to the target database");
            println!();
        }
        println!("🚀 Building census for complete weeks from {cutoff} (window: {spec})");
        println!();

        // Build the transform
        let enricher = match config.enricher() {
            Ok(e) => e,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };
        let pipeline = CensusPipeline::new(enricher, config.application.skip_invalid_records);

        // Connect the boundaries
        let source = match PostgresAttendanceSource::new(
            &config.source,
            config.sites.codes.clone(),
            config.application.skip_invalid_records,
        ) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create attendance source");
                eprintln!("Failed to initialize attendance source: {e}");
                return Ok(4); // Connection error exit code
            }
        };
        let store = match PostgresCensusStore::new(&config.target) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create census store");
                eprintln!("Failed to initialize census store: {e}");
                return Ok(4);
            }
        };

        if let Err(e) = source.test_connection().await {
            tracing::error!(error = %e, "Source connection test failed");
            eprintln!("Cannot reach attendance source: {e}");
            return Ok(4);
        }
        if !config.application.dry_run {
            if let Err(e) = store.test_connection().await {
                tracing::error!(error = %e, "Target connection test failed");
                eprintln!("Cannot reach census target: {e}");
                return Ok(4);
            }
        }

        // Ingest
        let records = match source.fetch_attendances(cutoff).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Ingestion failed");
                eprintln!("Ingestion failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        // Transform
        let output = match pipeline.run(&records) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Census transform failed");
                eprintln!("Census transform failed: {e}");
                return Ok(5);
            }
        };
        output.summary.log_summary();

        // Persist
        let inserted = match output.summary.earliest_week_starting {
            Some(min_weekstarting) => {
                if !config.application.dry_run {
                    if let Err(e) = store.ensure_table_exists().await {
                        tracing::error!(error = %e, "Failed to prepare census table");
                        eprintln!("Failed to prepare census table: {e}");
                        return Ok(5);
                    }
                }
                match store
                    .replace_weeks(min_weekstarting, &output.rows, config.application.dry_run)
                    .await
                {
                    Ok(n) => n,
                    Err(e) => {
                        tracing::error!(error = %e, "Census upload failed");
                        eprintln!("Census upload failed: {e}");
                        return Ok(5);
                    }
                }
            }
            None => {
                tracing::warn!("No attendance rows in window; nothing to upload");
                0
            }
        };

        // Display summary
        println!();
        println!("📊 Census Summary:");
        println!("  Records ingested: {}", output.summary.records_ingested);
        println!("  Records skipped: {}", output.summary.records_skipped);
        println!("  Hour facts expanded: {}", output.summary.facts_expanded);
        println!("  Census rows produced: {}", output.summary.rows_produced);
        if let Some(week) = output.summary.earliest_week_starting {
            println!("  Replacing weeks from: {week}");
        }
        println!("  Rows uploaded: {inserted}");
        println!(
            "  Duration: {:.2}s",
            output.summary.duration.as_secs_f64()
        );
        println!();

        if output.summary.is_complete() {
            println!("✅ Census run completed successfully!");
            Ok(0)
        } else {
            println!("⚠️  Census run completed with skipped records");
            Ok(1) // Partial success
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_defaults() {
        let args = RunArgs {
            dry_run: false,
            window: None,
            as_of: None,
        };

        assert!(!args.dry_run);
        assert!(args.window.is_none());
        assert!(args.as_of.is_none());
    }

    #[test]
    fn test_run_args_with_overrides() {
        let args = RunArgs {
            dry_run: true,
            window: Some("4 weeks".to_string()),
            as_of: Some("2024-03-13".to_string()),
        };

        assert!(args.dry_run);
        assert_eq!(args.window, Some("4 weeks".to_string()));
        assert_eq!(args.as_of, Some("2024-03-13".to_string()));
    }
}
