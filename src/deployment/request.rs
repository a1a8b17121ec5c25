//! Deployment request and transaction handle types.

use std::fmt;

use alloy::primitives::{Bytes, TxHash};
use serde::Serialize;

use crate::blockchain::ChainId;

/// Identity of the network a deployment targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    pub name: String,
    pub chain_id: ChainId,
}

impl Network {
    pub fn new(name: impl Into<String>, chain_id: u64) -> Self {
        Self {
            name: name.into(),
            chain_id: ChainId(chain_id),
        }
    }
}

/// A single contract deployment.
///
/// Constructor arguments are ABI-encoded by the caller and treated as
/// opaque bytes appended to the creation code.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    contract_name: String,
    bytecode: Bytes,
    constructor_args: Bytes,
    network: Network,
}

impl DeploymentRequest {
    pub fn new(
        contract_name: impl Into<String>,
        bytecode: Bytes,
        constructor_args: Bytes,
        network: Network,
    ) -> Self {
        Self {
            contract_name: contract_name.into(),
            bytecode,
            constructor_args,
            network,
        }
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn bytecode(&self) -> &Bytes {
        &self.bytecode
    }

    pub fn constructor_args(&self) -> &Bytes {
        &self.constructor_args
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Creation code followed by the encoded constructor arguments.
    pub fn init_code(&self) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + self.constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(&self.constructor_args);
        code.into()
    }
}

/// A broadcast deployment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TransactionHandle(TxHash);

impl TransactionHandle {
    pub fn new(tx_hash: TxHash) -> Self {
        Self(tx_hash)
    }

    pub fn tx_hash(&self) -> TxHash {
        self.0
    }
}

impl fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
