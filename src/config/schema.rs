//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the deployer.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::blockchain::{BlockchainError, BlockchainResult};

/// Root configuration for the deployer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeployerConfig {
    /// Confirmation tracking settings.
    pub confirmation: ConfirmationConfig,

    /// Verification retry settings.
    pub verification: VerificationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Sender settings for deployment transactions.
    pub deployer: SenderConfig,

    /// Named target networks.
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl DeployerConfig {
    /// Look up a network by name.
    pub fn network(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks.get(name)
    }
}

/// Confirmation tracking configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Confirmations required before verification begins.
    pub target_confirmations: u64,

    /// Delay between confirmation polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Give up after this many chain polls (unbounded when unset).
    pub max_polls: Option<u64>,

    /// Give up after this many seconds of waiting (unbounded when unset).
    pub max_wait_secs: Option<u64>,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            target_confirmations: 5,
            poll_interval_ms: 15_000,
            max_polls: None,
            max_wait_secs: None,
        }
    }
}

impl ConfirmationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_wait(&self) -> Option<Duration> {
        self.max_wait_secs.map(Duration::from_secs)
    }
}

/// Verification retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VerificationConfig {
    /// Maximum number of verification attempts.
    pub max_attempts: u32,

    /// Linear backoff unit in milliseconds for rate-limited attempts.
    pub base_delay_ms: u64,

    /// External verifier program.
    pub command: String,

    /// Arguments passed to the verifier program.
    ///
    /// Placeholders: `{address}`, `{contract}`, `{constructor_args}`,
    /// `{network}`, `{chain_id}`, `{explorer_api_url}`, `{api_key}`. An
    /// argument whose placeholder renders empty is left out.
    pub args: Vec<String>,

    /// Environment variable holding the explorer API key.
    pub api_key_env: Option<String>,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 10_000,
            command: "forge".to_string(),
            args: vec![
                "verify-contract".to_string(),
                "{address}".to_string(),
                "{contract}".to_string(),
                "--chain={chain_id}".to_string(),
                "--constructor-args={constructor_args}".to_string(),
                "--verifier-url={explorer_api_url}".to_string(),
                "--etherscan-api-key={api_key}".to_string(),
                "--watch".to_string(),
            ],
            api_key_env: Some("ETH_TEST_ETHERSCAN_API_KEY".to_string()),
        }
    }
}

impl VerificationConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// The explorer API key, if `api_key_env` names a non-empty variable.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(|var| std::env::var(var).ok())
    }

    pub fn api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key_env
            .as_deref()
            .and_then(lookup)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Sender of deployment transactions.
///
/// Signing is left to the node: the sender must be an account the node
/// manages. When unset, the node's first account is used.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SenderConfig {
    /// Sender address (hex).
    pub address: Option<String>,
}

/// Target network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: Option<String>,

    /// Environment variable holding the JSON-RPC endpoint URL.
    /// Takes precedence over `rpc_url` when set and non-empty.
    pub rpc_url_env: Option<String>,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 10 for Optimism, 480 for World Chain).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Block explorer settings, for chains the verifier does not know.
    pub explorer: Option<ExplorerConfig>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            rpc_url_env: None,
            failover_urls: Vec::new(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            explorer: None,
        }
    }
}

impl NetworkConfig {
    /// The effective RPC URL, reading `rpc_url_env` if configured.
    pub fn resolved_rpc_url(&self) -> BlockchainResult<String> {
        self.resolve_rpc_url_with(|var| std::env::var(var).ok())
    }

    /// Resolve the RPC URL using the given environment lookup.
    ///
    /// An unset or empty `rpc_url_env` falls back to `rpc_url`. With no
    /// `rpc_url` either, resolution fails instead of guessing an endpoint.
    pub fn resolve_rpc_url_with<F>(&self, lookup: F) -> BlockchainResult<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = self
            .rpc_url_env
            .as_deref()
            .and_then(|var| lookup(var))
            .filter(|url| !url.trim().is_empty());
        match (from_env, &self.rpc_url, &self.rpc_url_env) {
            (Some(url), _, _) => Ok(url.trim().to_string()),
            (None, Some(url), _) => Ok(url.clone()),
            (None, None, Some(var)) => Err(BlockchainError::Rpc(format!("{var} is not set"))),
            (None, None, None) => Err(BlockchainError::Rpc(
                "Neither rpc_url nor rpc_url_env is configured".to_string(),
            )),
        }
    }
}

/// Block explorer endpoints for a custom chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExplorerConfig {
    /// Verification API base URL.
    pub api_url: String,

    /// Human-facing explorer URL.
    pub browser_url: String,
}
