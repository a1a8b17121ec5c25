//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionReceipt;
use serde::Serialize;
use thiserror::Error;

// Re-export NetworkConfig from config module to avoid duplication
pub use crate::config::schema::NetworkConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Receipt returned without an inclusion block.
    #[error("Receipt for {0} has no block number")]
    MissingBlockNumber(TxHash),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// The parts of a transaction receipt the deployer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeploymentReceipt {
    /// Block the transaction was included in.
    pub block_number: u64,
    /// Address of the created contract, if the transaction created one.
    pub contract_address: Option<Address>,
    /// Execution status.
    pub success: bool,
}

impl DeploymentReceipt {
    /// Number of confirmations at the given head, counting the inclusion block.
    pub fn confirmations_at(&self, head: u64) -> u64 {
        head.saturating_add(1).saturating_sub(self.block_number)
    }
}

impl TryFrom<&TransactionReceipt> for DeploymentReceipt {
    type Error = BlockchainError;

    fn try_from(receipt: &TransactionReceipt) -> Result<Self, Self::Error> {
        let block_number = receipt
            .block_number
            .ok_or(BlockchainError::MissingBlockNumber(receipt.transaction_hash))?;
        Ok(Self {
            block_number,
            contract_address: receipt.contract_address,
            success: receipt.status(),
        })
    }
}
