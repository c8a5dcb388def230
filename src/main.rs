// src/main.rs

use clap::Parser;
use deployer::artifact::ContractArtifact;
use deployer::config::load_config;
use deployer::workflow::run_deployment;
use ethers::providers::{Http, Provider};
use ethers::utils::to_checksum;
use eyre::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// --- CLI Argument Parsing ---
#[derive(Parser, Debug)]
#[command(author, version, about = "Deploys a single contract artifact and reports its address", long_about = None)]
struct Cli {
    /// Contract artifact: Hardhat-style .json or raw bytecode hex file.
    /// Falls back to ARTIFACT_PATH from the environment.
    #[arg(value_name = "ARTIFACT")]
    artifact: Option<String>,

    /// Constructor argument, repeatable, in declaration order.
    /// Overrides CONSTRUCTOR_ARGS from the environment.
    #[arg(long = "constructor-arg", value_name = "VALUE")]
    constructor_args: Vec<String>,

    /// Confirmation depth to wait for before reporting success.
    #[arg(long)]
    confirmations: Option<u64>,

    /// Deadline for confirmation, in seconds.
    #[arg(long = "timeout-secs", value_name = "SECS")]
    timeout_secs: Option<u64>,
}

// --- Main Execution ---
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = load_config()?;
    if let Some(confirmations) = cli.confirmations {
        config.confirmations = confirmations.max(1);
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.confirmation_timeout_secs = timeout_secs;
    }

    let artifact_path = cli
        .artifact
        .or_else(|| config.artifact_path.clone())
        .ok_or_else(|| eyre::eyre!("No artifact given: pass <ARTIFACT> or set ARTIFACT_PATH"))?;
    let raw_args = if cli.constructor_args.is_empty() {
        config.constructor_args.clone()
    } else {
        cli.constructor_args
    };
    let artifact = ContractArtifact::load(&artifact_path, &raw_args)?;

    let provider = Provider::<Http>::try_from(config.http_rpc_url.clone())?;

    // The workflow returns a terminal result; translating it into the process
    // exit code happens here and nowhere else.
    match run_deployment(provider, &artifact, &config).await {
        Ok(record) => {
            println!("Contract Deployed to Address: {}", to_checksum(&record.contract_address, None));
            info!(tx_hash = ?record.transaction_hash, "Deployment complete.");
            Ok(())
        }
        Err(err) => {
            error!(kind = err.kind(), %err, "Deployment failed.");
            eprintln!("Deployment failed ({}): {}", err.kind(), err);
            std::process::exit(1);
        }
    }
}
