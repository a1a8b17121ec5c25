//! Verification with bounded retries on rate limits.
//!
//! # State Transitions
//! ```text
//! attempt k → service ok              → Verified
//! attempt k → "already verified"      → AlreadyVerified
//! attempt k → rate limited, k < max   → sleep(base * k) → attempt k+1
//! attempt k → rate limited, k == max  → Failed(RateLimitExhausted)
//! attempt k → any other error         → Failed(Rejected)
//! ```

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, Bytes};

use crate::config::VerificationConfig;
use crate::observability::metrics;
use crate::observability::{DeploymentEvent, DeploymentReporter, TracingReporter};
use crate::resilience::{calculate_backoff, Sleeper, TokioSleeper};
use crate::verification::classifier::{classify_failure, Classifier, FailureClass};
use crate::verification::types::{VerificationFailure, VerificationOutcome, VerificationService};

/// Retry bounds for rate-limited verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Linear backoff unit.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(10_000),
        }
    }
}

impl From<&VerificationConfig> for RetryPolicy {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: config.base_delay(),
        }
    }
}

/// Drives a `VerificationService` to a terminal outcome.
#[derive(Clone)]
pub struct VerificationRetrier<S = TokioSleeper> {
    policy: RetryPolicy,
    classifier: Classifier,
    sleeper: S,
    reporter: Arc<dyn DeploymentReporter>,
}

impl VerificationRetrier {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            classifier: classify_failure,
            sleeper: TokioSleeper,
            reporter: Arc::new(TracingReporter),
        }
    }
}

impl<S: Sleeper> VerificationRetrier<S> {
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> VerificationRetrier<T> {
        VerificationRetrier {
            policy: self.policy,
            classifier: self.classifier,
            sleeper,
            reporter: self.reporter,
        }
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn DeploymentReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Verify `address`, retrying while the service is rate limited.
    pub async fn verify<V: VerificationService>(
        &self,
        service: &V,
        address: Address,
        constructor_args: &Bytes,
    ) -> VerificationOutcome {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1u32;

        loop {
            tracing::debug!(address = %address, attempt, max_attempts, "Submitting verification");

            let err = match service.verify(address, constructor_args).await {
                Ok(()) => {
                    metrics::record_verification_attempt("verified");
                    return VerificationOutcome::Verified;
                }
                Err(err) => err,
            };

            match (self.classifier)(&err.message) {
                FailureClass::AlreadyVerified => {
                    metrics::record_verification_attempt("already_verified");
                    return VerificationOutcome::AlreadyVerified;
                }
                FailureClass::RateLimited if attempt < max_attempts => {
                    metrics::record_verification_attempt("rate_limited");
                    let delay = calculate_backoff(attempt, self.policy.base_delay);
                    self.reporter.report(&DeploymentEvent::VerificationRetry {
                        attempt,
                        max_attempts,
                        delay,
                    });
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
                FailureClass::RateLimited => {
                    metrics::record_verification_attempt("rate_limited");
                    tracing::debug!(error = %err, attempts = attempt, "Rate limit retries exhausted");
                    return VerificationOutcome::Failed(VerificationFailure::RateLimitExhausted {
                        attempts: attempt,
                    });
                }
                FailureClass::Other => {
                    metrics::record_verification_attempt("rejected");
                    return VerificationOutcome::Failed(VerificationFailure::Rejected(err.message));
                }
            }
        }
    }
}

impl<S> std::fmt::Debug for VerificationRetrier<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationRetrier")
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingReporter, RecordingSleeper, ScriptedVerifier};
    use crate::verification::VerifyError;

    const ADDRESS: Address = Address::ZERO;

    fn retrier(max_attempts: u32, base_ms: u64) -> (VerificationRetrier<RecordingSleeper>, RecordingSleeper) {
        let sleeper = RecordingSleeper::default();
        let retrier = VerificationRetrier::new(RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(base_ms),
        })
        .with_sleeper(sleeper.clone());
        (retrier, sleeper)
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let (retrier, sleeper) = retrier(5, 10_000);
        let service = ScriptedVerifier::new(vec![]);

        let outcome = retrier.verify(&service, ADDRESS, &Bytes::new()).await;

        assert_eq!(outcome, VerificationOutcome::Verified);
        assert_eq!(service.calls(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_exhausts_after_max_attempts() {
        let (retrier, sleeper) = retrier(4, 250);
        let service = ScriptedVerifier::always("Too Many Requests", 100);

        let outcome = retrier.verify(&service, ADDRESS, &Bytes::new()).await;

        assert_eq!(
            outcome,
            VerificationOutcome::Failed(VerificationFailure::RateLimitExhausted { attempts: 4 })
        );
        assert_eq!(service.calls(), 4);
        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_millis(750),
            ]
        );
    }

    #[tokio::test]
    async fn test_single_attempt_policy_never_sleeps() {
        let (retrier, sleeper) = retrier(1, 10_000);
        let service = ScriptedVerifier::always("429", 1);

        let outcome = retrier.verify(&service, ADDRESS, &Bytes::new()).await;

        assert_eq!(
            outcome,
            VerificationOutcome::Failed(VerificationFailure::RateLimitExhausted { attempts: 1 })
        );
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_already_verified_stops_mid_retry() {
        let (retrier, sleeper) = retrier(5, 1_000);
        let service = ScriptedVerifier::new(vec![
            Err(VerifyError::new("429 Too Many Requests")),
            Err(VerifyError::new("Contract source code ALREADY VERIFIED")),
            Err(VerifyError::new("429 Too Many Requests")),
        ]);

        let outcome = retrier.verify(&service, ADDRESS, &Bytes::new()).await;

        assert_eq!(outcome, VerificationOutcome::AlreadyVerified);
        assert_eq!(service.calls(), 2);
        assert_eq!(sleeper.delays(), vec![Duration::from_millis(1_000)]);
    }

    #[tokio::test]
    async fn test_other_error_not_retried() {
        let (retrier, sleeper) = retrier(5, 1_000);
        let service = ScriptedVerifier::always("Fail - Unable to verify", 5);

        let outcome = retrier.verify(&service, ADDRESS, &Bytes::new()).await;

        assert_eq!(
            outcome,
            VerificationOutcome::Failed(VerificationFailure::Rejected(
                "Fail - Unable to verify".to_string()
            ))
        );
        assert_eq!(service.calls(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_retry_events_reported() {
        let reporter = Arc::new(RecordingReporter::default());
        let (retrier, _) = retrier(3, 10);
        let retrier = retrier.with_reporter(reporter.clone());
        let service = ScriptedVerifier::always("too many requests", 1);

        retrier.verify(&service, ADDRESS, &Bytes::new()).await;

        assert_eq!(
            reporter.events(),
            vec![DeploymentEvent::VerificationRetry {
                attempt: 1,
                max_attempts: 3,
                delay: Duration::from_millis(10),
            }]
        );
    }

    #[tokio::test]
    async fn test_custom_classifier() {
        fn everything_retries(_: &str) -> FailureClass {
            FailureClass::RateLimited
        }
        let (retrier, sleeper) = retrier(2, 5);
        let retrier = retrier.with_classifier(everything_retries);
        let service = ScriptedVerifier::always("service unavailable", 1);

        let outcome = retrier.verify(&service, ADDRESS, &Bytes::new()).await;

        assert_eq!(outcome, VerificationOutcome::Verified);
        assert_eq!(sleeper.delays(), vec![Duration::from_millis(5)]);
    }
}
