//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (counts and intervals > 0, URLs parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DeployerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::DeployerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &DeployerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let confirmation = &config.confirmation;
    if confirmation.target_confirmations == 0 {
        errors.push(ValidationError::new(
            "confirmation.target_confirmations",
            "must be at least 1",
        ));
    }
    if confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "confirmation.poll_interval_ms",
            "must be positive",
        ));
    }
    if confirmation.max_polls == Some(0) {
        errors.push(ValidationError::new("confirmation.max_polls", "must be positive"));
    }
    if confirmation.max_wait_secs == Some(0) {
        errors.push(ValidationError::new(
            "confirmation.max_wait_secs",
            "must be positive",
        ));
    }

    let verification = &config.verification;
    if verification.max_attempts == 0 {
        errors.push(ValidationError::new(
            "verification.max_attempts",
            "must be at least 1",
        ));
    }
    if verification.base_delay_ms == 0 {
        errors.push(ValidationError::new(
            "verification.base_delay_ms",
            "must be positive",
        ));
    }
    if verification.command.trim().is_empty() {
        errors.push(ValidationError::new("verification.command", "must not be empty"));
    }

    if let Some(address) = &config.deployer.address {
        if address.parse::<alloy::primitives::Address>().is_err() {
            errors.push(ValidationError::new(
                "deployer.address",
                format!("invalid address '{address}'"),
            ));
        }
    }

    for (name, network) in &config.networks {
        if network.chain_id == 0 {
            errors.push(ValidationError::new(
                format!("networks.{name}.chain_id"),
                "must be non-zero",
            ));
        }
        if network.rpc_timeout_secs == 0 {
            errors.push(ValidationError::new(
                format!("networks.{name}.rpc_timeout_secs"),
                "must be positive",
            ));
        }
        match (&network.rpc_url, &network.rpc_url_env) {
            (Some(rpc_url), _) if url::Url::parse(rpc_url).is_err() => {
                errors.push(ValidationError::new(
                    format!("networks.{name}.rpc_url"),
                    format!("invalid URL '{rpc_url}'"),
                ));
            }
            (None, None) => {
                errors.push(ValidationError::new(
                    format!("networks.{name}.rpc_url"),
                    "either rpc_url or rpc_url_env must be set",
                ));
            }
            _ => {}
        }
        for failover in &network.failover_urls {
            if url::Url::parse(failover).is_err() {
                errors.push(ValidationError::new(
                    format!("networks.{name}.failover_urls"),
                    format!("invalid URL '{failover}'"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
