//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::DeployerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides read from the environment, applied after the file is parsed.
pub const ENV_CONFIRMATIONS: &str = "CONFIRMATIONS";
pub const ENV_POLL_INTERVAL_MS: &str = "CONFIRMATION_POLL_INTERVAL_MS";
pub const ENV_VERIFY_MAX_ATTEMPTS: &str = "VERIFY_MAX_ATTEMPTS";
pub const ENV_VERIFY_BASE_DELAY_MS: &str = "VERIFY_RETRY_BASE_DELAY_MS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for environment variable {var}")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<DeployerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: DeployerConfig = toml::from_str(&content)?;
    finish(config)
}

/// Load the file if it exists, otherwise start from defaults.
pub fn load_or_default(path: &Path) -> Result<DeployerConfig, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        finish(DeployerConfig::default())
    }
}

fn finish(mut config: DeployerConfig) -> Result<DeployerConfig, ConfigError> {
    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut DeployerConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = parse_var(&lookup, ENV_CONFIRMATIONS)? {
        config.confirmation.target_confirmations = v;
    }
    if let Some(v) = parse_var(&lookup, ENV_POLL_INTERVAL_MS)? {
        config.confirmation.poll_interval_ms = v;
    }
    if let Some(v) = parse_var(&lookup, ENV_VERIFY_MAX_ATTEMPTS)? {
        config.verification.max_attempts = v;
    }
    if let Some(v) = parse_var(&lookup, ENV_VERIFY_BASE_DELAY_MS)? {
        config.verification.base_delay_ms = v;
    }
    Ok(())
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
    }
}
