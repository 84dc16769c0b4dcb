//! Configuration management for the census pipeline.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Configuration lives in a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`CENSUS_*` prefix)
//! - Default values for optional settings
//! - Validation before any record is processed
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [window]
//! spec = "2 weeks"
//!
//! [sites]
//! codes = ["RAL26", "RAPNM", "RAL01", "RRV03", "RKEQ4"]
//! shorthands = ["BH", "NMUH", "RFH", "UCLH", "WH"]
//!
//! [departments]
//! ids = ["01", "02", "03"]
//! descriptions = [
//!     "Emergency Department",
//!     "Urgent Treatment Centre",
//!     "Urgent Care Centre",
//! ]
//!
//! [source]
//! connection_string = "${CENSUS_SOURCE_DSN}"
//! schema = "ecds"
//! table = "attendances"
//!
//! [target]
//! connection_string = "${CENSUS_TARGET_DSN}"
//! schema = "reporting"
//! table = "ed_hourly_census"
//! ```
//!
//! # Validation
//!
//! Configuration is validated on load:
//!
//! ```rust,no_run
//! use ed_census::config::load_config;
//!
//! # fn example() {
//! match load_config("census.toml") {
//!     Ok(config) => println!("Configuration valid"),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, CensusConfig, DatabaseConfig, DepartmentsConfig, LoggingConfig,
    SitesConfig, SourceConfig, TargetConfig, WindowConfig, WindowValue,
};
pub use secret::{secret_string, SecretString, SecretValue};
