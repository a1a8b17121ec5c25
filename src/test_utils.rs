//! In-memory collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash};

use crate::blockchain::{BlockchainError, BlockchainResult, ChainReader, DeploymentReceipt};
use crate::observability::{DeploymentEvent, DeploymentReporter};
use crate::resilience::Sleeper;
use crate::verification::{VerificationService, VerifyError};

pub const CONTRACT: Address = Address::new([0xaa; 20]);

/// Records requested delays and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}

/// Collects reported events.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<DeploymentEvent>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<DeploymentEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl DeploymentReporter for RecordingReporter {
    fn report(&self, event: &DeploymentEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn rpc_error() -> BlockchainError {
    BlockchainError::Rpc("connection refused".to_string())
}

pub fn receipt(block_number: u64) -> DeploymentReceipt {
    DeploymentReceipt {
        block_number,
        contract_address: Some(CONTRACT),
        success: true,
    }
}

/// Chain whose answers are scripted per call; the last answer repeats.
#[derive(Debug, Default)]
pub struct ScriptedChain {
    receipts: Mutex<VecDeque<BlockchainResult<Option<DeploymentReceipt>>>>,
    heads: Mutex<VecDeque<BlockchainResult<u64>>>,
    last_receipt: Mutex<Option<DeploymentReceipt>>,
    last_head: Mutex<u64>,
    receipt_calls: AtomicU32,
    head_calls: AtomicU32,
}

impl ScriptedChain {
    pub fn new(
        receipts: Vec<BlockchainResult<Option<DeploymentReceipt>>>,
        heads: Vec<BlockchainResult<u64>>,
    ) -> Self {
        Self {
            receipts: Mutex::new(receipts.into()),
            heads: Mutex::new(heads.into()),
            ..Default::default()
        }
    }

    pub fn receipt_calls(&self) -> u32 {
        self.receipt_calls.load(Ordering::SeqCst)
    }

    pub fn head_calls(&self) -> u32 {
        self.head_calls.load(Ordering::SeqCst)
    }
}

impl ChainReader for ScriptedChain {
    async fn get_transaction_receipt(
        &self,
        _tx_hash: TxHash,
    ) -> BlockchainResult<Option<DeploymentReceipt>> {
        self.receipt_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.receipts.lock().unwrap().pop_front();
        match next {
            Some(Ok(found)) => {
                *self.last_receipt.lock().unwrap() = found;
                Ok(found)
            }
            Some(Err(e)) => Err(e),
            None => Ok(*self.last_receipt.lock().unwrap()),
        }
    }

    async fn get_head_block_number(&self) -> BlockchainResult<u64> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.heads.lock().unwrap().pop_front();
        match next {
            Some(Ok(head)) => {
                *self.last_head.lock().unwrap() = head;
                Ok(head)
            }
            Some(Err(e)) => Err(e),
            None => Ok(*self.last_head.lock().unwrap()),
        }
    }
}

/// Verifier whose answers are scripted per call; succeeds once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedVerifier {
    answers: Mutex<VecDeque<Result<(), VerifyError>>>,
    calls: AtomicU32,
}

impl ScriptedVerifier {
    pub fn new(answers: Vec<Result<(), VerifyError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
            calls: AtomicU32::new(0),
        }
    }

    /// Fails the first `times` calls with the same message.
    pub fn always(message: &str, times: usize) -> Self {
        Self::new(vec![Err(VerifyError::new(message)); times])
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VerificationService for ScriptedVerifier {
    async fn verify(&self, _address: Address, _constructor_args: &Bytes) -> Result<(), VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.answers.lock().unwrap().pop_front();
        next.unwrap_or(Ok(()))
    }
}
