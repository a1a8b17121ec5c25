//! Deployment subsystem.
//!
//! # Data Flow
//! ```text
//! DeploymentRequest (artifact.rs → creation code, constructor args)
//!     → submitter.rs (chain id check, eth_sendTransaction)
//!     → TransactionHandle
//!     → confirmation.rs (receipt poll, then head poll until N confirmations)
//!     → verification retrier (address + constructor args)
//!     → DeploymentReport
//! ```
//!
//! # Design Decisions
//! - Confirmation and verification only see the `ChainReader` and
//!   `VerificationService` traits, so both run against scripted fakes in tests
//! - All waiting goes through a `Sleeper`; nothing here calls
//!   `tokio::time::sleep` directly
//! - Confirmation waits indefinitely unless a poll or wall-clock limit is set

pub mod artifact;
pub mod confirmation;
pub mod orchestrator;
pub mod request;
pub mod submitter;

pub use artifact::{load_artifact, parse_artifact, parse_hex, Artifact, ArtifactError};
pub use confirmation::{
    Confirmation, ConfirmationError, ConfirmationPolicy, ConfirmationState, ConfirmationTracker,
};
pub use orchestrator::{DeploymentError, DeploymentOrchestrator, DeploymentReport};
pub use request::{DeploymentRequest, Network, TransactionHandle};
pub use submitter::{DeploymentSubmitter, RpcSubmitter, SubmissionError};
