// src/workflow.rs
// The deployment pipeline: resolve signer -> submit -> await confirmation.

use crate::artifact::ContractArtifact;
use crate::config::Config;
use crate::error::DeployError;
use crate::{confirm, deploy, signer};
use chrono::{DateTime, Utc};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{JsonRpcClient, Middleware, Provider};
use ethers::signers::Signer;
use ethers::types::{Address, TxHash};
use ethers::utils::to_checksum;
use std::sync::Arc;
use tracing::info;

/// A submitted, unconfirmed deployment transaction. Created once by the
/// submitter and consumed exactly once by the confirmation waiter.
#[derive(Debug)]
pub struct PendingDeployment {
    pub transaction_hash: TxHash,
    pub submitted_at: DateTime<Utc>,
}

/// Terminal success artifact of the workflow; the failure counterpart is
/// `DeployError`, so a run can never be both at once.
#[derive(Debug, Clone)]
pub struct DeploymentRecord {
    pub contract_address: Address,
    pub transaction_hash: TxHash,
}

/// Runs one deployment end to end. Stages execute sequentially, each stage's
/// output feeding the next; the only suspension point is the receipt wait
/// inside the confirmation stage.
pub async fn run_deployment<P>(
    provider: Provider<P>,
    artifact: &ContractArtifact,
    config: &Config,
) -> Result<DeploymentRecord, DeployError>
where
    P: JsonRpcClient + 'static,
{
    // Resolve the signer before touching the network, so a missing key never
    // costs an RPC round trip.
    let wallet = signer::resolve(&config.private_keys)?;

    let chain_id = match config.chain_id {
        Some(id) => id,
        None => provider
            .get_chainid()
            .await
            .map_err(DeployError::network)?
            .as_u64(),
    };
    let wallet = wallet.with_chain_id(chain_id);

    println!("Deploying contracts with the account: {}", to_checksum(&wallet.address(), None));
    info!(signer = ?wallet.address(), chain_id, "Signer resolved, submitting deployment.");

    let client = Arc::new(SignerMiddleware::new(provider, wallet));
    let pending = deploy::submit(client.clone(), artifact, config).await?;
    confirm::await_confirmation(client, pending, config).await
}
