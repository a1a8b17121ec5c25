//! Source verification subsystem.
//!
//! # Data Flow
//! ```text
//! (address, constructor args)
//!     → retrier.rs (attempt loop, linear backoff on rate limits)
//!     → VerificationService (command.rs: external verifier CLI)
//!     → classifier.rs (error message → AlreadyVerified / RateLimited / Other)
//!     → VerificationOutcome
//! ```

pub mod classifier;
pub mod command;
pub mod retrier;
pub mod types;

pub use classifier::{classify_failure, Classifier, FailureClass};
pub use command::{CommandVerifier, VerifyContext};
pub use retrier::{RetryPolicy, VerificationRetrier};
pub use types::{VerificationFailure, VerificationOutcome, VerificationService, VerifyError};
