//! Verification outcomes and error definitions.

use std::fmt;
use std::future::Future;

use alloy::primitives::{Address, Bytes};
use serde::Serialize;
use thiserror::Error;

/// Failure reported by a verification service. The message is the only
/// signal available for classifying it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct VerifyError {
    pub message: String,
}

impl VerifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A block-explorer verification backend.
pub trait VerificationService: Send + Sync {
    fn verify(
        &self,
        address: Address,
        constructor_args: &Bytes,
    ) -> impl Future<Output = Result<(), VerifyError>> + Send;
}

/// Terminal result of verifying one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Verified,
    AlreadyVerified,
    Failed(VerificationFailure),
}

impl VerificationOutcome {
    /// `Verified` and `AlreadyVerified` both count as success.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Why verification gave up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationFailure {
    /// Every attempt was rate limited.
    RateLimitExhausted { attempts: u32 },
    /// The service rejected the submission.
    Rejected(String),
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimitExhausted { attempts } => {
                write!(f, "rate limited on all {attempts} attempts")
            }
            Self::Rejected(message) => write!(f, "{message}"),
        }
    }
}
