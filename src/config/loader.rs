//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CensusConfig, WindowValue};
use crate::config::secret::secret_string;
use crate::domain::errors::CensusError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`CensusConfig`]
/// 4. Applies environment variable overrides (`CENSUS_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns `CensusError::Configuration` if the file cannot be read, TOML
/// parsing fails, a referenced environment variable is unset, or validation
/// fails.
///
/// # Examples
///
/// ```no_run
/// use ed_census::config::loader::load_config;
///
/// let config = load_config("census.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CensusConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CensusError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CensusError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CensusConfig = toml::from_str(&contents)
        .map_err(|e| CensusError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CensusError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// # Errors
///
/// Returns an error naming every referenced environment variable that is
/// not set.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CensusError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `CENSUS_*` prefix
///
/// Environment variables follow the pattern `CENSUS_<SECTION>_<KEY>`,
/// e.g. `CENSUS_WINDOW_SPEC`, `CENSUS_TARGET_TABLE`.
fn apply_env_overrides(config: &mut CensusConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("CENSUS_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("CENSUS_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CENSUS_APPLICATION_SKIP_INVALID_RECORDS") {
        config.application.skip_invalid_records = val.parse().unwrap_or(false);
    }

    // Window overrides
    if let Ok(val) = std::env::var("CENSUS_WINDOW_SPEC") {
        config.window.spec = match val.parse::<u32>() {
            Ok(days) => WindowValue::Days(days),
            Err(_) => WindowValue::Text(val),
        };
    }
    if let Ok(val) = std::env::var("CENSUS_WINDOW_AS_OF") {
        let as_of = val.parse().map_err(|e| {
            CensusError::Configuration(format!("Invalid CENSUS_WINDOW_AS_OF '{val}': {e}"))
        })?;
        config.window.as_of = Some(as_of);
    }

    // Source overrides
    if let Ok(val) = std::env::var("CENSUS_SOURCE_CONNECTION_STRING") {
        config.source.database.connection_string = secret_string(val);
    }
    if let Ok(val) = std::env::var("CENSUS_SOURCE_SCHEMA") {
        config.source.database.schema = val;
    }
    if let Ok(val) = std::env::var("CENSUS_SOURCE_TABLE") {
        config.source.database.table = val;
    }
    if let Ok(val) = std::env::var("CENSUS_SOURCE_DEBUG_LIMIT") {
        if let Ok(limit) = val.parse() {
            config.source.debug_limit = Some(limit);
        }
    }

    // Target overrides
    if let Ok(val) = std::env::var("CENSUS_TARGET_CONNECTION_STRING") {
        config.target.database.connection_string = secret_string(val);
    }
    if let Ok(val) = std::env::var("CENSUS_TARGET_SCHEMA") {
        config.target.database.schema = val;
    }
    if let Ok(val) = std::env::var("CENSUS_TARGET_TABLE") {
        config.target.database.table = val;
    }
    if let Ok(val) = std::env::var("CENSUS_TARGET_CHUNK_SIZE") {
        if let Ok(size) = val.parse() {
            config.target.chunk_size = size;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("CENSUS_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CENSUS_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
