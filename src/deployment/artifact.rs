//! Creation code loading from compiler artifacts.
//!
//! Accepts Hardhat artifacts (`"bytecode": "0x…"`), Foundry artifacts
//! (`"bytecode": { "object": "0x…" }`) and plain hex files.

use std::fs;
use std::path::Path;

use alloy::primitives::{keccak256, Bytes, B256};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Artifact has no bytecode")]
    MissingBytecode,

    #[error("Bytecode has unlinked library references")]
    UnlinkedLibraries,

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

/// Creation code and, when recorded, the contract name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub contract_name: Option<String>,
    pub bytecode: Bytes,
}

impl Artifact {
    /// keccak256 of the creation code, as used for CREATE2 address derivation.
    pub fn init_code_hash(&self) -> B256 {
        keccak256(&self.bytecode)
    }
}

pub fn load_artifact(path: &Path) -> Result<Artifact, ArtifactError> {
    let content = fs::read_to_string(path)?;
    parse_artifact(&content)
}

pub fn parse_artifact(content: &str) -> Result<Artifact, ArtifactError> {
    let trimmed = content.trim();
    if !trimmed.starts_with('{') {
        return Ok(Artifact {
            contract_name: None,
            bytecode: parse_hex(trimmed)?,
        });
    }
    let json: Value = serde_json::from_str(trimmed)?;

    let code = match &json["bytecode"] {
        Value::String(code) => code.as_str(),
        Value::Object(obj) => obj
            .get("object")
            .and_then(Value::as_str)
            .ok_or(ArtifactError::MissingBytecode)?,
        _ => return Err(ArtifactError::MissingBytecode),
    };

    Ok(Artifact {
        contract_name: json["contractName"].as_str().map(str::to_string),
        bytecode: parse_hex(code)?,
    })
}

/// Parse `0x`-prefixed or bare hex into bytes.
pub fn parse_hex(input: &str) -> Result<Bytes, ArtifactError> {
    let input = input.trim();
    if input.contains("__") {
        return Err(ArtifactError::UnlinkedLibraries);
    }
    alloy::hex::decode(input)
        .map(Bytes::from)
        .map_err(|e| ArtifactError::InvalidHex(e.to_string()))
}
