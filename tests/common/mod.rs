//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use contract_deployer::blockchain::{BlockchainError, BlockchainResult, ChainReader, DeploymentReceipt};
use contract_deployer::deployment::{
    DeploymentRequest, DeploymentSubmitter, Network, SubmissionError, TransactionHandle,
};
use contract_deployer::observability::{DeploymentEvent, DeploymentReporter};
use contract_deployer::resilience::Sleeper;
use contract_deployer::verification::{VerificationService, VerifyError};

pub const CONTRACT: Address = Address::new([0xaa; 20]);
pub const TX_HASH: TxHash = TxHash::ZERO;

/// Start a mock JSON-RPC node on an ephemeral port.
///
/// `f` maps a method name to an HTTP status and the JSON-RPC `result`.
pub async fn start_mock_rpc<F>(f: F) -> SocketAddr
where
    F: Fn(&str) -> (u16, Value) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let _ = serve_one(socket, f.as_ref()).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

async fn serve_one<F>(mut socket: TcpStream, f: &F) -> std::io::Result<()>
where
    F: Fn(&str) -> (u16, Value),
{
    let request = read_request(&mut socket).await?;
    let request: Value = serde_json::from_slice(&request).unwrap_or(Value::Null);
    let method = request["method"].as_str().unwrap_or_default();

    let (status, result) = f(method);
    let (status_text, body) = match status {
        200 => (
            "200 OK",
            json!({ "jsonrpc": "2.0", "id": request["id"], "result": result }).to_string(),
        ),
        429 => ("429 Too Many Requests", "Too Many Requests".to_string()),
        503 => ("503 Service Unavailable", "Service Unavailable".to_string()),
        _ => ("500 Internal Server Error", "Internal Server Error".to_string()),
    };

    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_text,
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}

/// Read one HTTP request and return its body.
async fn read_request(socket: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(Vec::new());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    Ok(buf[header_end..].to_vec())
}

pub fn rpc_url(addr: SocketAddr) -> String {
    format!("http://{}", addr)
}

/// A request for a contract without constructor arguments.
pub fn request() -> DeploymentRequest {
    DeploymentRequest::new(
        "PaymentRegistry",
        Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]),
        Bytes::new(),
        Network::new("opSepolia", 11155420),
    )
}

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

    /// Fails every call with the same message.
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

/// Submitter that returns `TX_HASH`, or rejects every request.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    reject: bool,
    submitted: Mutex<Vec<String>>,
}

impl RecordingSubmitter {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Default::default()
        }
    }

    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

impl DeploymentSubmitter for RecordingSubmitter {
    async fn submit(&self, request: &DeploymentRequest) -> Result<TransactionHandle, SubmissionError> {
        self.submitted
            .lock()
            .unwrap()
            .push(request.contract_name().to_string());
        if self.reject {
            return Err(SubmissionError::Blockchain(BlockchainError::Rpc(
                "insufficient funds for gas * price + value".to_string(),
            )));
        }
        Ok(TransactionHandle::new(TX_HASH))
    }
}
