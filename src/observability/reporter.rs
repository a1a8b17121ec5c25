//! Progress reporting for deployment runs.
//!
//! The orchestrator and retrier emit a `DeploymentEvent` at every phase
//! transition. `TracingReporter` turns them into log lines; other reporters
//! can collect them or render them differently.

use std::time::Duration;

use alloy::primitives::{Address, TxHash};

use crate::verification::{VerificationFailure, VerificationOutcome};

/// A phase transition in a deployment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentEvent {
    /// Deployment transaction broadcast.
    Submitted { contract: String, tx_hash: TxHash },
    /// Target confirmation depth reached.
    Confirmed {
        tx_hash: TxHash,
        contract_address: Address,
        block_number: u64,
        confirmations: u64,
    },
    /// Verification was rate limited and will be retried after `delay`.
    VerificationRetry {
        attempt: u32,
        max_attempts: u32,
        delay: Duration,
    },
    /// Verification finished successfully.
    Verified {
        address: Address,
        outcome: VerificationOutcome,
    },
    /// Verification gave up. The contract stays deployed.
    VerificationFailed {
        address: Address,
        failure: VerificationFailure,
    },
}

/// Receives deployment progress.
pub trait DeploymentReporter: Send + Sync {
    fn report(&self, event: &DeploymentEvent);
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl DeploymentReporter for TracingReporter {
    fn report(&self, event: &DeploymentEvent) {
        match event {
            DeploymentEvent::Submitted { contract, tx_hash } => {
                tracing::info!(contract = %contract, tx_hash = %tx_hash, "Deployment submitted");
            }
            DeploymentEvent::Confirmed {
                tx_hash,
                contract_address,
                block_number,
                confirmations,
            } => {
                tracing::info!(
                    tx_hash = %tx_hash,
                    address = %contract_address,
                    block_number,
                    confirmations,
                    "Deployment confirmed"
                );
            }
            DeploymentEvent::VerificationRetry {
                attempt,
                max_attempts,
                delay,
            } => {
                tracing::info!(
                    attempt,
                    max_attempts,
                    delay_secs = delay.as_secs(),
                    "Verification rate-limited, retrying"
                );
            }
            DeploymentEvent::Verified { address, outcome } => match outcome {
                VerificationOutcome::AlreadyVerified => {
                    tracing::info!(address = %address, "Contract is already verified");
                }
                _ => tracing::info!(address = %address, "Contract verified"),
            },
            DeploymentEvent::VerificationFailed { address, failure } => {
                tracing::warn!(
                    address = %address,
                    reason = %failure,
                    "Verification failed; contract remains deployed"
                );
            }
        }
    }
}
