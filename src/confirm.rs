// src/confirm.rs
// Confirmation waiter: polls for the receipt under the caller's deadline and
// extracts the deployed contract's address.

use crate::config::Config;
use crate::error::DeployError;
use crate::workflow::{DeploymentRecord, PendingDeployment};
use chrono::Utc;
use ethers::providers::Middleware;
use ethers::types::{Address, TxHash, U64};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};
use tracing::{debug, error, info, instrument, trace, warn};

const TX_SUCCESS_STATUS: U64 = U64([1]);

/// Blocks until the deployment transaction is confirmed to the configured
/// depth, or the deadline elapses.
///
/// Consumes the `PendingDeployment`: one pending handle yields exactly one
/// result. On timeout the transaction may still confirm later, so the hash is
/// carried in the error for manual follow-up and must not be resubmitted
/// blindly.
#[instrument(skip(client, pending, config), fields(tx_hash = ?pending.transaction_hash))]
pub async fn await_confirmation<M: Middleware>(
    client: Arc<M>,
    pending: PendingDeployment,
    config: &Config,
) -> Result<DeploymentRecord, DeployError> {
    let tx_hash = pending.transaction_hash;
    let deadline = Duration::from_secs(config.confirmation_timeout_secs);

    match timeout(deadline, watch_for_receipt(client, &pending, config)).await {
        Ok(result) => {
            if let Ok(record) = &result {
                let elapsed = Utc::now() - pending.submitted_at;
                info!(
                    contract_address = ?record.contract_address,
                    elapsed_secs = elapsed.num_seconds(),
                    "Deployment confirmed."
                );
            }
            result
        }
        Err(_) => {
            error!(?tx_hash, deadline_secs = config.confirmation_timeout_secs,
                "Timed out waiting for confirmation. Transaction may still confirm later; do not resubmit blindly.");
            Err(DeployError::ConfirmationTimeout {
                tx_hash,
                timeout_secs: config.confirmation_timeout_secs,
            })
        }
    }
}

async fn watch_for_receipt<M: Middleware>(
    client: Arc<M>,
    pending: &PendingDeployment,
    config: &Config,
) -> Result<DeploymentRecord, DeployError> {
    let transaction_hash = pending.transaction_hash;
    let mut poll = interval(Duration::from_millis(config.receipt_poll_interval_ms));

    let receipt = loop {
        poll.tick().await;
        match client.get_transaction_receipt(transaction_hash).await {
            Ok(Some(receipt)) => break receipt,
            Ok(None) => trace!(?transaction_hash, "No receipt yet."),
            Err(e) => warn!(?transaction_hash, error = %e, "Receipt poll failed, will retry."),
        }
    };

    if receipt.status != Some(TX_SUCCESS_STATUS) {
        error!(?transaction_hash, status = ?receipt.status, "Creation transaction reverted on-chain.");
        return Err(DeployError::DeploymentFailedOnChain { tx_hash: transaction_hash });
    }

    let contract_address = match receipt.contract_address {
        Some(addr) if addr != Address::zero() => addr,
        other => {
            error!(?transaction_hash, contract_address = ?other,
                "Receipt carries no contract address despite success status.");
            return Err(DeployError::DeploymentFailedOnChain { tx_hash: transaction_hash });
        }
    };

    if config.confirmations > 1 {
        wait_for_depth(&client, &mut poll, &receipt, transaction_hash, config.confirmations).await;
    }

    Ok(DeploymentRecord {
        contract_address,
        transaction_hash,
    })
}

/// Waits until `confirmations` blocks (receipt block included) are on top of
/// the inclusion block. Poll errors are retried under the outer deadline.
async fn wait_for_depth<M: Middleware>(
    client: &Arc<M>,
    poll: &mut tokio::time::Interval,
    receipt: &ethers::types::TransactionReceipt,
    transaction_hash: TxHash,
    confirmations: u64,
) {
    // Saturating math: an absurd configured depth must stall (and hit the
    // outer deadline), never overflow.
    let receipt_block = receipt.block_number.unwrap_or_default();
    let target = receipt_block.saturating_add(U64::from(confirmations));
    loop {
        match client.get_block_number().await {
            Ok(current) if current.saturating_add(U64::one()) >= target => {
                debug!(?transaction_hash, %current, confirmations, "Confirmation depth reached.");
                return;
            }
            Ok(current) => trace!(?transaction_hash, %current, "Waiting for confirmation depth."),
            Err(e) => warn!(?transaction_hash, error = %e, "Block number poll failed, will retry."),
        }
        poll.tick().await;
    }
}
