//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "census.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing census configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set CENSUS_SOURCE_DSN and CENSUS_TARGET_DSN");
                println!("  3. Validate configuration: ed-census validate-config");
                println!("  4. Preview a run: ed-census run --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the sample configuration
    fn sample_config() -> String {
        r#"# ED Census Configuration File
# Hourly emergency department occupancy census

[application]
log_level = "info"
dry_run = false
# Abort on the first malformed attendance record (false), or log and
# skip it (true)
skip_invalid_records = false

[window]
# The window to process, always snapped back to the previous Monday so
# only complete weeks are built. One of:
#   spec = 14              # last 14 days
#   spec = "2 weeks"       # last 2 weeks
#   spec = "3 months"      # from the first of the month, 3 months back
#   spec = "1 year"        # last calendar year
#   spec = "2024-01-15 date"  # from a literal date
spec = "2 weeks"
# Reference date the window counts back from; omit to use today
# as_of = "2024-03-13"

[sites]
# Parallel arrays: shorthands[i] labels codes[i]
codes = ["RAL26", "RAPNM", "RAL01", "RRV03", "RKEQ4"]
shorthands = ["BH", "NMUH", "RFH", "UCLH", "WH"]

[departments]
# Parallel arrays: descriptions[i] labels ids[i]; unmapped ids report
# as "Unknown"
ids = ["01", "02", "03"]
descriptions = [
    "Emergency Department",
    "Urgent Treatment Centre",
    "Urgent Care Centre",
]

[source]
connection_string = "${CENSUS_SOURCE_DSN}"
schema = "ecds"
table = "attendances"
# Cap ingestion while debugging
# debug_limit = 10

[target]
connection_string = "${CENSUS_TARGET_DSN}"
schema = "reporting"
table = "ed_hourly_census"
chunk_size = 150

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }
}
