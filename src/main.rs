//! Contract Deployer (v1)
//!
//! Deploys a contract, waits for confirmations and verifies its source.
//!
//! # Architecture Overview
//!
//! ```text
//!   artifact + args     ┌────────────┐     ┌──────────────┐     ┌──────────────┐
//!   ───────────────────▶│ submitter  │────▶│ confirmation │────▶│ verification │───▶ report
//!                       │ (eth_send) │     │   tracker    │     │   retrier    │
//!                       └─────┬──────┘     └──────┬───────┘     └──────┬───────┘
//!                             │                   │                    │
//!                             ▼                   ▼                    ▼
//!                       ┌──────────────────────────────┐       ┌──────────────┐
//!                       │  blockchain client (RPC,     │       │ verifier CLI │
//!                       │  failover, timeouts)         │       │ (forge, ...) │
//!                       └──────────────────────────────┘       └──────────────┘
//! ```

use std::path::{Path, PathBuf};

use alloy::primitives::{Address, Bytes, TxHash};
use clap::{Parser, Subcommand};

use contract_deployer::blockchain::BlockchainClient;
use contract_deployer::config::{load_or_default, DeployerConfig, NetworkConfig};
use contract_deployer::deployment::{
    load_artifact, parse_hex, ConfirmationPolicy, ConfirmationTracker, DeploymentOrchestrator,
    DeploymentRequest, Network, RpcSubmitter, TransactionHandle,
};
use contract_deployer::observability::{logging, metrics};
use contract_deployer::verification::{
    CommandVerifier, RetryPolicy, VerificationOutcome, VerificationRetrier, VerifyContext,
};

#[derive(Parser)]
#[command(name = "contract-deployer")]
#[command(about = "Deploy, confirm and verify smart contracts", long_about = None)]
struct Cli {
    /// Configuration file; defaults apply when it does not exist.
    #[arg(short, long, global = true, default_value = "deployer.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a contract, wait for confirmations and verify it
    Deploy {
        #[arg(short, long)]
        network: String,
        /// Hardhat or Foundry artifact, or a file of raw creation code hex
        #[arg(short, long)]
        artifact: PathBuf,
        /// Contract name; defaults to the name recorded in the artifact
        #[arg(long)]
        contract: Option<String>,
        /// ABI-encoded constructor arguments (hex)
        #[arg(long)]
        constructor_args: Option<String>,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Wait for confirmations of an already sent deployment
    Wait {
        #[arg(short, long)]
        network: String,
        #[arg(long)]
        tx_hash: TxHash,
    },
    /// Verify an already deployed contract
    Verify {
        #[arg(short, long)]
        network: String,
        #[arg(long)]
        address: Address,
        #[arg(long)]
        contract: String,
        #[arg(long)]
        constructor_args: Option<String>,
    },
    /// Print the creation code hash of an artifact
    InitcodeHash {
        #[arg(short, long)]
        artifact: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(&cli.config)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("contract-deployer v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match cli.command {
        Commands::Deploy {
            network,
            artifact,
            contract,
            constructor_args,
            json,
        } => deploy(&config, &network, &artifact, contract, constructor_args, json).await,
        Commands::Wait { network, tx_hash } => wait(&config, &network, tx_hash).await,
        Commands::Verify {
            network,
            address,
            contract,
            constructor_args,
        } => verify(&config, &network, address, contract, constructor_args).await,
        Commands::InitcodeHash { artifact, json } => {
            let artifact = load_artifact(&artifact)?;
            if json {
                let output = serde_json::json!({
                    "contract": artifact.contract_name,
                    "bytecode_length": artifact.bytecode.len(),
                    "init_code_hash": artifact.init_code_hash(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("bytecode length: {}", artifact.bytecode.len());
                println!("init code hash:  {}", artifact.init_code_hash());
            }
            Ok(())
        }
    }
}

async fn deploy(
    config: &DeployerConfig,
    network_name: &str,
    artifact_path: &Path,
    contract: Option<String>,
    constructor_args: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let network = network_config(config, network_name)?;
    let artifact = load_artifact(artifact_path)?;
    let contract = contract
        .or(artifact.contract_name.clone())
        .ok_or("contract name missing from artifact, pass --contract")?;
    let constructor_args = decode_args(constructor_args.as_deref())?;

    let client = BlockchainClient::new(network.clone()).await?;
    let sender = config
        .deployer
        .address
        .as_deref()
        .map(str::parse::<Address>)
        .transpose()?;

    let orchestrator = DeploymentOrchestrator::new(
        client.clone(),
        CommandVerifier::from_config(
            &config.verification,
            VerifyContext::for_network(contract.as_str(), network_name, network),
        ),
        RpcSubmitter::new(client, sender),
        ConfirmationPolicy::from(&config.confirmation),
        RetryPolicy::from(&config.verification),
    );

    let request = DeploymentRequest::new(
        contract,
        artifact.bytecode,
        constructor_args,
        Network::new(network_name, network.chain_id),
    );
    let report = orchestrator.run(request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("contract:      {}", report.contract);
        println!("address:       {}", report.contract_address);
        println!("transaction:   {}", report.transaction);
        println!("block:         {}", report.block_number);
        println!("confirmations: {}", report.confirmations);
        println!("verification:  {}", describe(&report.verification));
    }
    Ok(())
}

async fn wait(
    config: &DeployerConfig,
    network_name: &str,
    tx_hash: TxHash,
) -> Result<(), Box<dyn std::error::Error>> {
    let network = network_config(config, network_name)?;
    let client = BlockchainClient::new(network.clone()).await?;

    let tracker = ConfirmationTracker::new(ConfirmationPolicy::from(&config.confirmation));
    let confirmation = tracker.wait(&client, &TransactionHandle::new(tx_hash)).await?;

    println!("block:         {}", confirmation.receipt.block_number);
    println!("confirmations: {}", confirmation.confirmations);
    if let Some(address) = confirmation.receipt.contract_address {
        println!("address:       {address}");
    }
    Ok(())
}

async fn verify(
    config: &DeployerConfig,
    network_name: &str,
    address: Address,
    contract: String,
    constructor_args: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let network = network_config(config, network_name)?;
    let constructor_args = decode_args(constructor_args.as_deref())?;

    let verifier = CommandVerifier::from_config(
        &config.verification,
        VerifyContext::for_network(contract, network_name, network),
    );
    let retrier = VerificationRetrier::new(RetryPolicy::from(&config.verification));
    let outcome = retrier.verify(&verifier, address, &constructor_args).await;

    println!("verification:  {}", describe(&outcome));
    match outcome {
        VerificationOutcome::Failed(failure) => Err(failure.to_string().into()),
        _ => Ok(()),
    }
}

fn network_config<'a>(
    config: &'a DeployerConfig,
    name: &str,
) -> Result<&'a NetworkConfig, Box<dyn std::error::Error>> {
    config.network(name).ok_or_else(|| {
        let known: Vec<&str> = config.networks.keys().map(String::as_str).collect();
        format!("unknown network {name:?} (configured: {})", known.join(", ")).into()
    })
}

fn decode_args(hex: Option<&str>) -> Result<Bytes, Box<dyn std::error::Error>> {
    match hex {
        Some(hex) => Ok(parse_hex(hex)?),
        None => Ok(Bytes::new()),
    }
}

fn describe(outcome: &VerificationOutcome) -> String {
    match outcome {
        VerificationOutcome::Verified => "verified".to_string(),
        VerificationOutcome::AlreadyVerified => "already verified".to_string(),
        VerificationOutcome::Failed(failure) => format!("failed ({failure})"),
    }
}
