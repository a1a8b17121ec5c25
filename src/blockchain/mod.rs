//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkConfig (RPC URL or env var, failovers, chain id)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → reader.rs (receipt + head block queries for confirmation tracking)
//! ```
//!
//! # Constraints
//! - No key material is handled here; the node signs deployments
//! - All RPC calls have configurable timeouts
//! - Receipt and head lookups fail over across endpoints

pub mod client;
pub mod reader;
pub mod types;

pub use client::BlockchainClient;
pub use reader::ChainReader;
pub use types::{BlockchainError, BlockchainResult, ChainId, DeploymentReceipt};
