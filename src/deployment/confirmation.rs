//! Confirmation tracking for a submitted deployment.
//!
//! # Phases
//! ```text
//! receipt lookup   (every poll_interval until mined; errors = not yet)
//!     → head polling (every poll_interval until head - inclusion + 1 >= target)
//!     → Confirmation
//! ```
//!
//! Without `max_polls` or `max_wait` the wait is unbounded: the transaction
//! is known to be broadcast, so RPC failures are retried indefinitely.

use std::time::{Duration, Instant};

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::{ChainReader, DeploymentReceipt};
use crate::config::ConfirmationConfig;
use crate::deployment::request::TransactionHandle;
use crate::observability::metrics;
use crate::resilience::{Sleeper, TokioSleeper};

/// How long and how often to wait for confirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub target_confirmations: u64,
    pub poll_interval: Duration,
    /// Upper bound on chain calls (receipt and head lookups combined).
    pub max_polls: Option<u64>,
    /// Upper bound on total wall-clock wait.
    pub max_wait: Option<Duration>,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            target_confirmations: 5,
            poll_interval: Duration::from_millis(15_000),
            max_polls: None,
            max_wait: None,
        }
    }
}

impl From<&ConfirmationConfig> for ConfirmationPolicy {
    fn from(config: &ConfirmationConfig) -> Self {
        Self {
            target_confirmations: config.target_confirmations,
            poll_interval: config.poll_interval(),
            max_polls: config.max_polls,
            max_wait: config.max_wait(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("Transaction {tx_hash} not confirmed after {polls} polls")]
    PollLimitReached { tx_hash: TxHash, polls: u64 },

    #[error("Transaction {tx_hash} not confirmed within {waited:?}")]
    Timeout { tx_hash: TxHash, waited: Duration },

    #[error("Transaction {tx_hash} reverted in block {block_number}")]
    Reverted { tx_hash: TxHash, block_number: u64 },
}

impl ConfirmationError {
    /// True for both the poll-count and the wall-clock bound.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::PollLimitReached { .. } | Self::Timeout { .. })
    }
}

/// What the tracker has learned so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationState {
    pub receipt: Option<DeploymentReceipt>,
    pub observed_head: Option<u64>,
}

impl ConfirmationState {
    /// Record a head observation. A head lower than one already seen comes
    /// from a lagging node and is ignored.
    pub fn observe_head(&mut self, head: u64) -> u64 {
        let head = self.observed_head.map_or(head, |seen| seen.max(head));
        self.observed_head = Some(head);
        head
    }

    pub fn confirmations(&self) -> u64 {
        match (self.receipt, self.observed_head) {
            (Some(receipt), Some(head)) => receipt.confirmations_at(head),
            _ => 0,
        }
    }
}

/// A deployment that reached its confirmation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub receipt: DeploymentReceipt,
    pub head: u64,
    pub confirmations: u64,
}

/// Polls a chain until a transaction has enough confirmations.
#[derive(Debug, Clone)]
pub struct ConfirmationTracker<S = TokioSleeper> {
    policy: ConfirmationPolicy,
    sleeper: S,
}

impl ConfirmationTracker {
    pub fn new(policy: ConfirmationPolicy) -> Self {
        Self {
            policy,
            sleeper: TokioSleeper,
        }
    }
}

impl<S: Sleeper> ConfirmationTracker<S> {
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> ConfirmationTracker<T> {
        ConfirmationTracker {
            policy: self.policy,
            sleeper,
        }
    }

    /// Block until `handle` has `target_confirmations`, or a bound is hit.
    pub async fn wait<C: ChainReader>(
        &self,
        chain: &C,
        handle: &TransactionHandle,
    ) -> Result<Confirmation, ConfirmationError> {
        let tx_hash = handle.tx_hash();
        match self.policy.max_wait {
            None => self.poll(chain, tx_hash).await,
            Some(max_wait) => tokio::time::timeout(max_wait, self.poll(chain, tx_hash))
                .await
                .unwrap_or(Err(ConfirmationError::Timeout {
                    tx_hash,
                    waited: max_wait,
                })),
        }
    }

    async fn poll<C: ChainReader>(
        &self,
        chain: &C,
        tx_hash: TxHash,
    ) -> Result<Confirmation, ConfirmationError> {
        let started = Instant::now();
        let target = self.policy.target_confirmations.max(1);
        let mut state = ConfirmationState::default();
        let mut polls = 0u64;

        let receipt = loop {
            self.check_poll_budget(tx_hash, polls)?;
            polls += 1;

            match chain.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    metrics::record_confirmation_poll("receipt", true);
                    break receipt;
                }
                Ok(None) => {
                    metrics::record_confirmation_poll("receipt", true);
                    tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                }
                Err(e) => {
                    metrics::record_confirmation_poll("receipt", false);
                    tracing::debug!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed, retrying");
                }
            }
            self.sleeper.sleep(self.policy.poll_interval).await;
        };

        if !receipt.success {
            return Err(ConfirmationError::Reverted {
                tx_hash,
                block_number: receipt.block_number,
            });
        }
        state.receipt = Some(receipt);
        tracing::debug!(tx_hash = %tx_hash, block_number = receipt.block_number, "Transaction mined");

        loop {
            self.check_poll_budget(tx_hash, polls)?;
            polls += 1;

            match chain.get_head_block_number().await {
                Ok(head) => {
                    metrics::record_confirmation_poll("head", true);
                    let head = state.observe_head(head);
                    let confirmations = state.confirmations();
                    if confirmations >= target {
                        metrics::record_confirmation_wait(started.elapsed());
                        return Ok(Confirmation {
                            receipt,
                            head,
                            confirmations,
                        });
                    }
                    tracing::debug!(
                        tx_hash = %tx_hash,
                        confirmations,
                        required = target,
                        "Waiting for confirmations"
                    );
                }
                Err(e) => {
                    metrics::record_confirmation_poll("head", false);
                    tracing::debug!(tx_hash = %tx_hash, error = %e, "Head lookup failed, retrying");
                }
            }
            self.sleeper.sleep(self.policy.poll_interval).await;
        }
    }

    fn check_poll_budget(&self, tx_hash: TxHash, polls: u64) -> Result<(), ConfirmationError> {
        match self.policy.max_polls {
            Some(max) if polls >= max => Err(ConfirmationError::PollLimitReached { tx_hash, polls }),
            _ => Ok(()),
        }
    }
}
