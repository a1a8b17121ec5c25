//! Read-only chain access used while waiting for confirmations.

use std::future::Future;

use alloy::primitives::TxHash;

use crate::blockchain::types::{BlockchainResult, DeploymentReceipt};

/// The two chain queries the confirmation tracker needs.
///
/// Both may fail transiently; callers decide whether to retry.
pub trait ChainReader: Send + Sync {
    /// Receipt for a transaction, or `None` while it is not yet mined.
    fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = BlockchainResult<Option<DeploymentReceipt>>> + Send;

    /// Number of the canonical head block.
    fn get_head_block_number(&self) -> impl Future<Output = BlockchainResult<u64>> + Send;
}
