//! Configuration schema types
//!
//! This module defines the configuration structure for the census pipeline.

use crate::config::SecretString;
use crate::core::enrich::Enricher;
use crate::core::window::WindowSpec;
use crate::domain::errors::CensusError;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Main census configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensusConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Reporting window settings
    pub window: WindowConfig,

    /// Site code → shorthand labelling
    pub sites: SitesConfig,

    /// Department type id → description labelling
    pub departments: DepartmentsConfig,

    /// Attendance source database
    pub source: SourceConfig,

    /// Census target database
    pub target: TargetConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CensusConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value found.
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.window.validate()?;
        self.sites.validate()?;
        self.departments.validate()?;
        self.source.validate()?;
        self.target.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds the row enricher from the configured mappings
    ///
    /// # Errors
    ///
    /// Returns `CensusError::Configuration` if either mapping's parallel
    /// arrays are misaligned.
    pub fn enricher(&self) -> crate::domain::Result<Enricher> {
        Ok(Enricher::new(
            self.sites.shorthand_map()?,
            self.departments.description_map()?,
        ))
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (don't write to the target database)
    #[serde(default)]
    pub dry_run: bool,

    /// Skip malformed attendance records instead of aborting the run
    #[serde(default)]
    pub skip_invalid_records: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
            skip_invalid_records: false,
        }
    }
}

/// Reporting window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// The window to process: a bare day count or a `"<N> <unit>"` string
    pub spec: WindowValue,

    /// Reference date the window counts back from; today when absent
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl WindowConfig {
    /// The window as a parsed specification
    pub fn window_spec(&self) -> crate::domain::Result<WindowSpec> {
        match &self.spec {
            WindowValue::Days(n) => {
                if *n == 0 {
                    return Err(CensusError::Configuration(
                        "window length must be at least 1".to_string(),
                    ));
                }
                Ok(WindowSpec::Days(*n))
            }
            WindowValue::Text(s) => s.parse(),
        }
    }

    /// The date the window is resolved against
    pub fn reference_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    fn validate(&self) -> Result<(), String> {
        self.window_spec().map(|_| ()).map_err(|e| e.to_string())
    }
}

/// A window value as written in TOML: either an integer day count or a
/// window string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindowValue {
    /// Bare integer, interpreted as days
    Days(u32),

    /// `"<N> <unit>"` or `"<YYYY-MM-DD> date"`
    Text(String),
}

/// Site labelling configuration
///
/// `codes` and `shorthands` are parallel arrays zipped into the site
/// labelling map; a length mismatch is a configuration error rather than a
/// silent positional misalignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    /// ODS site codes in scope for the census
    pub codes: Vec<String>,

    /// Short labels, one per entry in `codes`
    pub shorthands: Vec<String>,
}

impl SitesConfig {
    /// The site code → shorthand map
    pub fn shorthand_map(&self) -> crate::domain::Result<BTreeMap<String, String>> {
        zip_mapping("sites", "codes", "shorthands", &self.codes, &self.shorthands)
    }

    fn validate(&self) -> Result<(), String> {
        if self.codes.is_empty() {
            return Err("sites.codes cannot be empty".to_string());
        }
        self.shorthand_map().map(|_| ()).map_err(|e| e.to_string())
    }
}

/// Department labelling configuration
///
/// `ids` and `descriptions` are parallel arrays with the same alignment
/// rule as [`SitesConfig`]. Ids absent from the map fall back to
/// `"Unknown"` at enrichment time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentsConfig {
    /// ECDS department type ids
    pub ids: Vec<String>,

    /// Descriptive labels, one per entry in `ids`
    pub descriptions: Vec<String>,
}

impl DepartmentsConfig {
    /// The department id → description map
    pub fn description_map(&self) -> crate::domain::Result<BTreeMap<String, String>> {
        zip_mapping(
            "departments",
            "ids",
            "descriptions",
            &self.ids,
            &self.descriptions,
        )
    }

    fn validate(&self) -> Result<(), String> {
        if self.ids.is_empty() {
            return Err("departments.ids cannot be empty".to_string());
        }
        self.description_map().map(|_| ()).map_err(|e| e.to_string())
    }
}

/// Zips two parallel configuration arrays into a map, rejecting
/// misalignment and duplicate keys
fn zip_mapping(
    section: &str,
    keys_name: &str,
    values_name: &str,
    keys: &[String],
    values: &[String],
) -> crate::domain::Result<BTreeMap<String, String>> {
    if keys.len() != values.len() {
        return Err(CensusError::Configuration(format!(
            "{section}.{keys_name} has {} entries but {section}.{values_name} has {}; \
             the arrays must align one-to-one",
            keys.len(),
            values.len()
        )));
    }

    let mut map = BTreeMap::new();
    for (key, value) in keys.iter().zip(values) {
        if map.insert(key.clone(), value.clone()).is_some() {
            return Err(CensusError::Configuration(format!(
                "{section}.{keys_name} contains duplicate entry '{key}'"
            )));
        }
    }
    Ok(map)
}

/// Connection settings shared by the source and target databases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    ///
    /// Stored securely in memory and automatically zeroized on drop.
    pub connection_string: SecretString,

    /// Schema holding the table
    pub schema: String,

    /// Table name
    pub table: String,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Connection acquisition timeout
    #[serde(default = "default_connection_timeout_seconds")]
    pub connection_timeout_seconds: u64,

    /// Per-statement timeout
    #[serde(default = "default_statement_timeout_seconds")]
    pub statement_timeout_seconds: u64,
}

impl DatabaseConfig {
    fn validate(&self, section: &str) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.connection_string.expose_secret().is_empty() {
            return Err(format!("{section}.connection_string cannot be empty"));
        }
        let conn = self.connection_string.expose_secret();
        if !conn.starts_with("postgresql://") && !conn.starts_with("postgres://") {
            return Err(format!(
                "{section}.connection_string must start with postgresql:// or postgres://"
            ));
        }

        // Schema and table names are interpolated into SQL text, so they
        // must be plain identifiers
        for (name, value) in [("schema", &self.schema), ("table", &self.table)] {
            if !is_plain_identifier(value) {
                return Err(format!(
                    "{section}.{name} '{value}' must be a plain identifier \
                     (letters, digits, underscores)"
                ));
            }
        }

        if self.max_connections == 0 {
            return Err(format!("{section}.max_connections must be at least 1"));
        }
        Ok(())
    }

    /// The table qualified with its schema
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

fn is_plain_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !s.starts_with(|c: char| c.is_ascii_digit())
}

/// Attendance source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Connection settings
    #[serde(flatten)]
    pub database: DatabaseConfig,

    /// Cap on ingested rows, for debugging against large extracts
    #[serde(default)]
    pub debug_limit: Option<i64>,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        self.database.validate("source")?;
        if let Some(limit) = self.debug_limit {
            if limit <= 0 {
                return Err("source.debug_limit must be positive".to_string());
            }
        }
        Ok(())
    }
}

/// Census target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Connection settings
    #[serde(flatten)]
    pub database: DatabaseConfig,

    /// Rows per insert batch
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl TargetConfig {
    fn validate(&self) -> Result<(), String> {
        self.database.validate("target")?;
        if self.chunk_size == 0 {
            return Err("target.chunk_size must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to a local file in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".into());
        }
        if !["daily", "hourly"].contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be 'daily' or 'hourly'",
                self.local_rotation
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_connections() -> usize {
    10
}

fn default_connection_timeout_seconds() -> u64 {
    30
}

fn default_statement_timeout_seconds() -> u64 {
    60
}

fn default_chunk_size() -> usize {
    150
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
[window]
spec = "2 weeks"

[sites]
codes = ["RAL26", "RAL01"]
shorthands = ["BH", "RFH"]

[departments]
ids = ["01", "02", "03"]
descriptions = ["Emergency Department", "Urgent Treatment Centre", "Urgent Care Centre"]

[source]
connection_string = "postgresql://census:pw@localhost/ecds"
schema = "ecds"
table = "attendances"

[target]
connection_string = "postgresql://census:pw@localhost/reporting"
schema = "reporting"
table = "ed_hourly_census"
"#
    }

    #[test]
    fn test_minimal_config_parses_and_validates() {
        let config: CensusConfig = toml::from_str(minimal_toml()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.application.log_level, "info");
        assert!(!config.application.dry_run);
        assert_eq!(config.target.chunk_size, 150);
        assert_eq!(config.source.database.max_connections, 10);
    }

    #[test]
    fn test_window_value_integer_days() {
        let config: CensusConfig = toml::from_str(&minimal_toml().replace(
            "spec = \"2 weeks\"",
            "spec = 14",
        ))
        .unwrap();
        assert_eq!(
            config.window.window_spec().unwrap(),
            WindowSpec::Days(14)
        );
    }

    #[test]
    fn test_window_as_of() {
        let config: CensusConfig = toml::from_str(&minimal_toml().replace(
            "spec = \"2 weeks\"",
            "spec = \"2 weeks\"\nas_of = \"2024-03-13\"",
        ))
        .unwrap();
        assert_eq!(
            config.window.reference_date(),
            NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
        );
    }

    #[test]
    fn test_misaligned_sites_rejected() {
        let config: CensusConfig = toml::from_str(&minimal_toml().replace(
            "shorthands = [\"BH\", \"RFH\"]",
            "shorthands = [\"BH\"]",
        ))
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("align"));
    }

    #[test]
    fn test_misaligned_departments_rejected() {
        let config: CensusConfig = toml::from_str(&minimal_toml().replace(
            "ids = [\"01\", \"02\", \"03\"]",
            "ids = [\"01\", \"02\"]",
        ))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_site_code_rejected() {
        let config: CensusConfig = toml::from_str(&minimal_toml().replace(
            "codes = [\"RAL26\", \"RAL01\"]",
            "codes = [\"RAL26\", \"RAL26\"]",
        ))
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn test_bad_window_rejected() {
        let config: CensusConfig = toml::from_str(&minimal_toml().replace(
            "spec = \"2 weeks\"",
            "spec = \"2 fortnights\"",
        ))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsafe_table_name_rejected() {
        let config: CensusConfig = toml::from_str(&minimal_toml().replace(
            "table = \"ed_hourly_census\"",
            "table = \"census; drop table x\"",
        ))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_postgres_connection_string_rejected() {
        let config: CensusConfig = toml::from_str(&minimal_toml().replace(
            "connection_string = \"postgresql://census:pw@localhost/ecds\"",
            "connection_string = \"mssql://census:pw@localhost/ecds\"",
        ))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enricher_built_from_config() {
        let config: CensusConfig = toml::from_str(minimal_toml()).unwrap();
        let enricher = config.enricher().unwrap();
        let map = config.sites.shorthand_map().unwrap();
        assert_eq!(map.get("RAL26"), Some(&"BH".to_string()));
        drop(enricher);
    }

    #[test]
    fn test_qualified_table() {
        let config: CensusConfig = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(
            config.target.database.qualified_table(),
            "reporting.ed_hourly_census"
        );
    }
}
