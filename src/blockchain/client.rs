//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint (primary + failovers)
//! - Query chain state (block number, receipts, accounts)
//! - Broadcast deployment transactions through the primary endpoint
//! - Handle timeouts and network errors gracefully

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::reader::ChainReader;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ChainId, DeploymentReceipt, NetworkConfig,
};
use crate::observability::metrics;

/// Blockchain RPC client wrapper with failover support.
#[derive(Clone)]
pub struct BlockchainClient {
    /// List of providers (primary + failovers).
    providers: Vec<Arc<dyn Provider + Send + Sync>>,
    /// Network configuration.
    config: NetworkConfig,
    /// RPC URL the primary provider was built from.
    rpc_url: String,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// Chain ID verification failures are logged, not returned; the
    /// endpoint may simply be unreachable at startup.
    pub async fn new(config: NetworkConfig) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let rpc_url = config.resolved_rpc_url()?;
        let mut providers = Vec::new();

        // 1. Add primary provider
        let primary_url: url::Url = rpc_url
            .parse()
            .map_err(|e| BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
        providers.push(
            Arc::new(ProviderBuilder::new().connect_http(primary_url))
                as Arc<dyn Provider + Send + Sync>,
        );

        // 2. Add failover providers
        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(
                    Arc::new(ProviderBuilder::new().connect_http(url))
                        as Arc<dyn Provider + Send + Sync>,
                );
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let client = Self {
            providers,
            config,
            rpc_url,
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %client.rpc_url,
                    chain_id = client.config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_chain_id();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(ChainId(result)),
                Ok(Err(e)) => {
                    metrics::record_rpc_failure("eth_chainId");
                    tracing::warn!(provider_idx = i, error = %e, "RPC error, trying next provider");
                }
                Err(_) => {
                    metrics::record_rpc_failure("eth_chainId");
                    tracing::warn!(provider_idx = i, "RPC timeout, trying next provider");
                }
            }
        }
        Err(BlockchainError::Rpc("All RPC providers failed".to_string()))
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_block_number();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    metrics::record_rpc_failure("eth_blockNumber");
                    tracing::warn!(provider_idx = i, error = %e, "RPC error");
                }
                Err(_) => {
                    metrics::record_rpc_failure("eth_blockNumber");
                    tracing::warn!(provider_idx = i, "RPC timeout");
                }
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get block number".to_string()))
    }

    /// Get a transaction receipt by hash.
    pub async fn get_receipt(&self, tx_hash: TxHash) -> BlockchainResult<Option<DeploymentReceipt>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_transaction_receipt(tx_hash);
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(Some(receipt))) => return DeploymentReceipt::try_from(&receipt).map(Some),
                Ok(Ok(None)) => return Ok(None),
                Ok(Err(e)) => {
                    metrics::record_rpc_failure("eth_getTransactionReceipt");
                    tracing::warn!(provider_idx = i, error = %e, "RPC error");
                }
                Err(_) => {
                    metrics::record_rpc_failure("eth_getTransactionReceipt");
                    tracing::warn!(provider_idx = i, "RPC timeout");
                }
            }
        }
        Err(BlockchainError::Rpc("All providers failed to get receipt".to_string()))
    }

    /// Accounts managed by the node.
    pub async fn get_accounts(&self) -> BlockchainResult<Vec<Address>> {
        for (i, provider) in self.providers.iter().enumerate() {
            let fut = provider.get_accounts();
            match timeout(self.timeout_duration, fut).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => tracing::warn!(provider_idx = i, error = %e, "RPC error"),
                Err(_) => tracing::warn!(provider_idx = i, "RPC timeout"),
            }
        }
        Err(BlockchainError::Rpc("All providers failed to list accounts".to_string()))
    }

    /// Broadcast a transaction for the node to sign and send.
    ///
    /// Only the primary endpoint is used: resending an unsigned request to a
    /// failover node could be signed again under a different nonce.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let fut = self.provider().send_transaction(tx);
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(BlockchainError::Rpc(e.to_string())),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Get the underlying primary provider.
    pub fn provider(&self) -> &(dyn Provider + Send + Sync) {
        self.providers[0].as_ref()
    }
}

impl ChainReader for BlockchainClient {
    async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<DeploymentReceipt>> {
        self.get_receipt(tx_hash).await
    }

    async fn get_head_block_number(&self) -> BlockchainResult<u64> {
        self.get_block_number().await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
