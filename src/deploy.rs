// src/deploy.rs
// Deployment submitter: builds, signs and broadcasts the contract-creation
// transaction.

use crate::artifact::ContractArtifact;
use crate::config::Config;
use crate::error::{classify_rpc_error, DeployError};
use crate::gas;
use crate::workflow::PendingDeployment;
use chrono::Utc;
use ethers::core::types::transaction::eip2718::TypedTransaction;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{JsonRpcClient, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Eip1559TransactionRequest;
use ethers::types::U256;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Signs and broadcasts one contract-creation transaction.
///
/// Exactly one transaction goes out per call; there is no internal retry and
/// no idempotence guarantee. Calling this twice with the same inputs yields
/// two distinct on-chain transactions (a property of the ledger, not a bug).
#[instrument(skip_all, fields(init_code_len = artifact.init_code().len()))]
pub async fn submit<P>(
    client: Arc<SignerMiddleware<Provider<P>, LocalWallet>>,
    artifact: &ContractArtifact,
    config: &Config,
) -> Result<PendingDeployment, DeployError>
where
    P: JsonRpcClient + 'static,
{
    let from = client.signer().address();
    let chain_id = client.signer().chain_id();

    let nonce = client
        .get_transaction_count(from, None)
        .await
        .map_err(DeployError::network)?;
    debug!(%nonce, "Deployment nonce fetched.");

    let gas_info = gas::fetch_gas_price(client.clone(), config).await;

    // Contract creation: `to` stays unset, the init code rides in `data`.
    let tx_request = Eip1559TransactionRequest::new()
        .from(from)
        .data(artifact.init_code().clone())
        .nonce(nonce)
        .chain_id(chain_id)
        .max_fee_per_gas(gas_info.max_fee_per_gas)
        .max_priority_fee_per_gas(gas_info.max_priority_fee_per_gas);
    let mut typed_tx: TypedTransaction = tx_request.into();

    let gas_limit = match config.gas_limit {
        Some(limit) => U256::from(limit),
        None => {
            gas::estimate_deployment_gas(client.clone(), &typed_tx, config.gas_limit_buffer_percentage)
                .await?
        }
    };
    typed_tx.set_gas(gas_limit);

    let signature = client
        .signer()
        .sign_transaction(&typed_tx)
        .await
        .map_err(|e| DeployError::SubmissionRejected(format!("failed to sign deployment transaction: {e}")))?;
    let raw_tx = typed_tx.rlp_signed(&signature);

    let pending_tx = client
        .send_raw_transaction(raw_tx)
        .await
        .map_err(|e| classify_rpc_error(&e))?;
    let transaction_hash = pending_tx.tx_hash();

    info!(?transaction_hash, "Deployment transaction broadcast.");
    Ok(PendingDeployment {
        transaction_hash,
        submitted_at: Utc::now(),
    })
}
