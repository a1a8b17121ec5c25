//! Drives one deployment through submission, confirmation and verification.
//!
//! # Error Policy
//! - Submission and confirmation errors are fatal and returned
//! - Verification never fails the run: the contract is already on chain,
//!   so a failed verification is reported as a warning and recorded in the
//!   `DeploymentReport`
//! - There is no rollback

use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::ChainReader;
use crate::deployment::confirmation::{ConfirmationError, ConfirmationPolicy, ConfirmationTracker};
use crate::deployment::request::{DeploymentRequest, Network, TransactionHandle};
use crate::deployment::submitter::{DeploymentSubmitter, SubmissionError};
use crate::observability::metrics;
use crate::observability::{DeploymentEvent, DeploymentReporter, TracingReporter};
use crate::resilience::{Sleeper, TokioSleeper};
use crate::verification::{
    Classifier, RetryPolicy, VerificationOutcome, VerificationRetrier, VerificationService,
};

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("Submission failed: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Confirmation failed: {0}")]
    Confirmation(#[from] ConfirmationError),

    #[error("Receipt for {0} has no contract address")]
    NoContractAddress(TxHash),
}

/// Final status of a deployment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    pub run_id: Uuid,
    pub contract: String,
    pub network: Network,
    pub transaction: TransactionHandle,
    pub contract_address: Address,
    pub block_number: u64,
    pub confirmations: u64,
    pub verification: VerificationOutcome,
}

/// Sequences submit → confirm → verify for a single contract.
pub struct DeploymentOrchestrator<C, V, D, S = TokioSleeper> {
    chain: C,
    verifier: V,
    submitter: D,
    tracker: ConfirmationTracker<S>,
    retrier: VerificationRetrier<S>,
    reporter: Arc<dyn DeploymentReporter>,
}

impl<C, V, D> DeploymentOrchestrator<C, V, D>
where
    C: ChainReader,
    V: VerificationService,
    D: DeploymentSubmitter,
{
    pub fn new(
        chain: C,
        verifier: V,
        submitter: D,
        confirmation: ConfirmationPolicy,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            chain,
            verifier,
            submitter,
            tracker: ConfirmationTracker::new(confirmation),
            retrier: VerificationRetrier::new(retry),
            reporter: Arc::new(TracingReporter),
        }
    }
}

impl<C, V, D, S> DeploymentOrchestrator<C, V, D, S>
where
    C: ChainReader,
    V: VerificationService,
    D: DeploymentSubmitter,
    S: Sleeper + Clone,
{
    /// Replace the sleeper used for poll and backoff waits.
    pub fn with_sleeper<T: Sleeper + Clone>(self, sleeper: T) -> DeploymentOrchestrator<C, V, D, T> {
        DeploymentOrchestrator {
            chain: self.chain,
            verifier: self.verifier,
            submitter: self.submitter,
            tracker: self.tracker.with_sleeper(sleeper.clone()),
            retrier: self.retrier.with_sleeper(sleeper),
            reporter: self.reporter,
        }
    }

    /// Replace the rule that sorts verifier errors.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.retrier = self.retrier.with_classifier(classifier);
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn DeploymentReporter>) -> Self {
        self.retrier = self.retrier.with_reporter(reporter.clone());
        self.reporter = reporter;
        self
    }

    pub async fn run(&self, request: DeploymentRequest) -> Result<DeploymentReport, DeploymentError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "deployment",
            %run_id,
            contract = %request.contract_name(),
            network = %request.network().name,
        );

        let result = self.execute(run_id, request).instrument(span).await;
        match &result {
            Ok(report) if report.verification.is_success() => metrics::record_deployment("verified"),
            Ok(_) => metrics::record_deployment("unverified"),
            Err(_) => metrics::record_deployment("failed"),
        }
        result
    }

    async fn execute(
        &self,
        run_id: Uuid,
        request: DeploymentRequest,
    ) -> Result<DeploymentReport, DeploymentError> {
        let handle = self.submitter.submit(&request).await?;
        self.reporter.report(&DeploymentEvent::Submitted {
            contract: request.contract_name().to_string(),
            tx_hash: handle.tx_hash(),
        });

        let confirmation = self.tracker.wait(&self.chain, &handle).await?;

        let contract_address = confirmation
            .receipt
            .contract_address
            .ok_or(DeploymentError::NoContractAddress(handle.tx_hash()))?;
        self.reporter.report(&DeploymentEvent::Confirmed {
            tx_hash: handle.tx_hash(),
            contract_address,
            block_number: confirmation.receipt.block_number,
            confirmations: confirmation.confirmations,
        });

        let verification = self
            .retrier
            .verify(&self.verifier, contract_address, request.constructor_args())
            .await;
        match &verification {
            VerificationOutcome::Failed(failure) => {
                self.reporter.report(&DeploymentEvent::VerificationFailed {
                    address: contract_address,
                    failure: failure.clone(),
                });
            }
            outcome => {
                self.reporter.report(&DeploymentEvent::Verified {
                    address: contract_address,
                    outcome: outcome.clone(),
                });
            }
        }

        Ok(DeploymentReport {
            run_id,
            contract: request.contract_name().to_string(),
            network: request.network().clone(),
            transaction: handle,
            contract_address,
            block_number: confirmation.receipt.block_number,
            confirmations: confirmation.confirmations,
            verification,
        })
    }
}
