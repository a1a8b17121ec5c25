//! Verification through an external verifier CLI.
//!
//! The explorer protocol stays with the tool (e.g. `forge verify-contract`);
//! this adapter only renders its arguments and turns a non-zero exit into a
//! `VerifyError` carrying the tool's output.

use alloy::primitives::{Address, Bytes};
use tokio::process::Command;

use crate::config::{NetworkConfig, VerificationConfig};
use crate::verification::types::{VerificationService, VerifyError};

/// Values substituted into verifier arguments.
#[derive(Debug, Clone, Default)]
pub struct VerifyContext {
    pub contract: String,
    pub network: String,
    pub chain_id: u64,
    pub explorer_api_url: Option<String>,
}

impl VerifyContext {
    pub fn for_network(contract: impl Into<String>, name: &str, network: &NetworkConfig) -> Self {
        Self {
            contract: contract.into(),
            network: name.to_string(),
            chain_id: network.chain_id,
            explorer_api_url: network.explorer.as_ref().map(|e| e.api_url.clone()),
        }
    }
}

/// Runs a verifier program once per attempt.
#[derive(Clone)]
pub struct CommandVerifier {
    program: String,
    args: Vec<String>,
    context: VerifyContext,
    api_key: Option<String>,
}

impl CommandVerifier {
    pub fn new(program: impl Into<String>, args: Vec<String>, context: VerifyContext) -> Self {
        Self {
            program: program.into(),
            args,
            context,
            api_key: None,
        }
    }

    /// Build from config, reading the explorer API key from `api_key_env`.
    pub fn from_config(config: &VerificationConfig, context: VerifyContext) -> Self {
        Self::new(config.command.clone(), config.args.clone(), context)
            .with_api_key(config.api_key())
    }

    /// Explorer API key rendered into `{api_key}`.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Rendered arguments with the API key masked, for logging.
    fn display_args(&self, args: &[String]) -> Vec<String> {
        match &self.api_key {
            Some(key) => args.iter().map(|arg| arg.replace(key.as_str(), "***")).collect(),
            None => args.to_vec(),
        }
    }

    /// Arguments for one invocation.
    ///
    /// An argument is dropped when any placeholder in it renders empty, so
    /// `--constructor-args={constructor_args}` disappears for contracts
    /// without constructor arguments.
    pub fn render_args(&self, address: Address, constructor_args: &Bytes) -> Vec<String> {
        let values = [
            ("{address}", address.to_checksum(None)),
            ("{contract}", self.context.contract.clone()),
            (
                "{constructor_args}",
                if constructor_args.is_empty() {
                    String::new()
                } else {
                    constructor_args.to_string()
                },
            ),
            ("{network}", self.context.network.clone()),
            ("{chain_id}", self.context.chain_id.to_string()),
            (
                "{explorer_api_url}",
                self.context.explorer_api_url.clone().unwrap_or_default(),
            ),
            ("{api_key}", self.api_key.clone().unwrap_or_default()),
        ];

        self.args
            .iter()
            .filter_map(|template| {
                let mut rendered = template.clone();
                for (placeholder, value) in &values {
                    if rendered.contains(placeholder) {
                        if value.is_empty() {
                            return None;
                        }
                        rendered = rendered.replace(placeholder, value);
                    }
                }
                Some(rendered)
            })
            .collect()
    }
}

impl std::fmt::Debug for CommandVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandVerifier")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("context", &self.context)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl VerificationService for CommandVerifier {
    async fn verify(&self, address: Address, constructor_args: &Bytes) -> Result<(), VerifyError> {
        let args = self.render_args(address, constructor_args);
        tracing::debug!(
            program = %self.program,
            args = ?self.display_args(&args),
            "Running verifier"
        );

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| VerifyError::new(format!("failed to run {}: {}", self.program, e)))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let message = [stderr.trim(), stdout.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Err(VerifyError::new(if message.is_empty() {
            format!("{} exited with {}", self.program, output.status)
        } else {
            message
        }))
    }
}
