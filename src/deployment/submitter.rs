//! Deployment transaction submission.

use std::future::Future;

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use thiserror::Error;

use crate::blockchain::{BlockchainClient, BlockchainError};
use crate::deployment::request::{DeploymentRequest, TransactionHandle};

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Blockchain(#[from] BlockchainError),

    #[error("Deployment bytecode is empty")]
    EmptyBytecode,

    #[error("Node manages no accounts and no sender is configured")]
    NoSender,
}

/// Broadcasts a deployment and returns as soon as it has a hash.
/// Mining is observed separately through the chain reader.
pub trait DeploymentSubmitter: Send + Sync {
    fn submit(
        &self,
        request: &DeploymentRequest,
    ) -> impl Future<Output = Result<TransactionHandle, SubmissionError>> + Send;
}

/// Submits through `eth_sendTransaction`; the node holds the sender's key.
#[derive(Debug, Clone)]
pub struct RpcSubmitter {
    client: BlockchainClient,
    sender: Option<Address>,
}

impl RpcSubmitter {
    pub fn new(client: BlockchainClient, sender: Option<Address>) -> Self {
        Self { client, sender }
    }

    async fn sender(&self) -> Result<Address, SubmissionError> {
        if let Some(sender) = self.sender {
            return Ok(sender);
        }
        self.client
            .get_accounts()
            .await?
            .first()
            .copied()
            .ok_or(SubmissionError::NoSender)
    }
}

impl DeploymentSubmitter for RpcSubmitter {
    async fn submit(&self, request: &DeploymentRequest) -> Result<TransactionHandle, SubmissionError> {
        if request.bytecode().is_empty() {
            return Err(SubmissionError::EmptyBytecode);
        }

        let expected = request.network().chain_id.0;
        let actual = self.client.get_chain_id().await?.0;
        if actual != expected {
            return Err(BlockchainError::ChainMismatch { expected, actual }.into());
        }

        let sender = self.sender().await?;
        tracing::debug!(
            sender = %sender,
            init_code_len = request.init_code().len(),
            "Sending deployment transaction"
        );

        let tx = TransactionRequest::default()
            .with_from(sender)
            .with_deploy_code(request.init_code());

        let tx_hash = self.client.send_transaction(tx).await?;
        Ok(TransactionHandle::new(tx_hash))
    }
}
