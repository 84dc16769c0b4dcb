//! Integration tests for dry-run mode
//!
//! These tests verify that dry-run mode prevents all database writes while
//! allowing the census build to run normally.

use chrono::NaiveDate;
use ed_census::adapters::database::traits::CensusStore;
use ed_census::adapters::postgresql::PostgresCensusStore;
use ed_census::config::schema::{DatabaseConfig, TargetConfig};
use ed_census::config::secret_string;
use ed_census::core::enrich::Enricher;
use ed_census::core::pipeline::CensusPipeline;
use ed_census::domain::AttendanceRecord;
use std::collections::BTreeMap;

fn unreachable_target() -> TargetConfig {
    TargetConfig {
        database: DatabaseConfig {
            connection_string: secret_string(
                "postgresql://census:pw@unreachable.invalid:5432/reporting".to_string(),
            ),
            schema: "reporting".to_string(),
            table: "ed_hourly_census".to_string(),
            max_connections: 2,
            connection_timeout_seconds: 1,
            statement_timeout_seconds: 1,
        },
        chunk_size: 150,
    }
}

fn census_rows() -> Vec<ed_census::domain::CensusRow> {
    let record = AttendanceRecord::from_raw(
        "RAL26",
        "01",
        "2024-01-01",
        "08:15:00",
        "2024-01-01",
        "10:00:00",
    )
    .unwrap();

    let pipeline = CensusPipeline::new(Enricher::new(BTreeMap::new(), BTreeMap::new()), false);
    pipeline.run(&[record]).unwrap().rows
}

#[tokio::test]
async fn test_dry_run_skips_all_writes() {
    // The target host does not exist; a dry run must still succeed because
    // it never opens a connection
    let store = PostgresCensusStore::new(&unreachable_target()).unwrap();
    let rows = census_rows();
    let min_week = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let inserted = store.replace_weeks(min_week, &rows, true).await.unwrap();
    assert_eq!(inserted, 0);
}

#[test]
fn test_dry_run_config_flag() {
    let toml = r#"
[application]
dry_run = true

[window]
spec = "2 weeks"

[sites]
codes = ["RAL26"]
shorthands = ["BH"]

[departments]
ids = ["01"]
descriptions = ["Emergency Department"]

[source]
connection_string = "postgresql://census:pw@localhost/ecds"
schema = "ecds"
table = "attendances"

[target]
connection_string = "postgresql://census:pw@localhost/reporting"
schema = "reporting"
table = "ed_hourly_census"
"#;

    let config: ed_census::config::CensusConfig = toml::from_str(toml).unwrap();
    assert!(config.application.dry_run);
}
