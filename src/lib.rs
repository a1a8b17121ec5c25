//! Contract deployment orchestrator library.
//!
//! Submits a contract creation transaction, waits for a configurable number
//! of confirmations and then verifies the source with an explorer, retrying
//! on rate limits.

// Core subsystems
pub mod config;
pub mod blockchain;
pub mod deployment;
pub mod verification;

// Cross-cutting concerns
pub mod observability;
pub mod resilience;

#[cfg(test)]
mod test_utils;

pub use config::DeployerConfig;
pub use deployment::{DeploymentOrchestrator, DeploymentReport, DeploymentRequest};
pub use verification::VerificationOutcome;
