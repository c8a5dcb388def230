// src/gas.rs
// Module for gas price fetching and deployment gas estimation.

use crate::config::Config;
use crate::error::{classify_rpc_error, DeployError};
use ethers::core::types::transaction::eip2718::TypedTransaction;
use ethers::providers::Middleware;
use ethers::types::U256;
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

#[derive(Debug, Clone, Copy)]
pub struct GasInfo {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

/// Fetches EIP-1559 fees, falling back to the legacy gas price and finally to
/// config-only values. Never fails: a dead network surfaces on the next RPC
/// interaction instead, where it can be classified properly.
#[instrument(skip(client, config), level = "debug")]
pub async fn fetch_gas_price<M: Middleware>(client: Arc<M>, config: &Config) -> GasInfo {
    if let Some(fixed) = config.gas_price_override {
        warn!(%fixed, "Gas price override is set, using it for both max_fee and max_priority_fee.");
        return GasInfo { max_fee_per_gas: fixed, max_priority_fee_per_gas: fixed };
    }

    let max_prio_wei = config.max_priority_fee_per_gas;
    let fallback_prio_wei = config.fallback_gas_price.unwrap_or(max_prio_wei);

    match client.estimate_eip1559_fees(None).await {
        Ok((max_fee, max_priority_fee)) => {
            let final_max_priority_fee = max_priority_fee.min(max_prio_wei);
            let current_base_fee = client.get_gas_price().await.unwrap_or(max_fee);
            let required_max_fee = current_base_fee + final_max_priority_fee;
            let final_max_fee = max_fee.max(required_max_fee);
            debug!(%final_max_fee, %final_max_priority_fee, "EIP-1559 fees estimated.");
            GasInfo { max_fee_per_gas: final_max_fee, max_priority_fee_per_gas: final_max_priority_fee }
        }
        Err(e) => {
            warn!(error = ?e, "EIP-1559 fee estimation failed, attempting fallback.");
            match client.get_gas_price().await {
                Ok(legacy_price) => {
                    let final_max_priority_fee = fallback_prio_wei.min(max_prio_wei);
                    let final_max_fee = legacy_price + final_max_priority_fee;
                    debug!(%final_max_fee, %final_max_priority_fee, "Using legacy price fallback gas prices.");
                    GasInfo { max_fee_per_gas: final_max_fee, max_priority_fee_per_gas: final_max_priority_fee }
                }
                Err(e_legacy) => {
                    error!(error_eip1559 = ?e, error_legacy = ?e_legacy, "Both EIP-1559 and legacy gas price fetch failed.");
                    let final_max_priority_fee = fallback_prio_wei.min(max_prio_wei);
                    let final_max_fee = final_max_priority_fee * 2;
                    warn!(%final_max_fee, %final_max_priority_fee, "Using purely config-based fallback gas prices. Risk of underpricing.");
                    GasInfo { max_fee_per_gas: final_max_fee, max_priority_fee_per_gas: final_max_priority_fee }
                }
            }
        }
    }
}

/// Estimates the gas limit for the contract-creation transaction and adds the
/// configured buffer percentage. An estimation revert means the node rejected
/// the payload and classifies as `SubmissionRejected`.
#[instrument(skip(client, tx), level = "debug")]
pub async fn estimate_deployment_gas<M: Middleware>(
    client: Arc<M>,
    tx: &TypedTransaction,
    buffer_percentage: u64,
) -> Result<U256, DeployError> {
    let estimate = client
        .estimate_gas(tx, None)
        .await
        .map_err(|e| classify_rpc_error(&e))?;
    let buffered = estimate + estimate * U256::from(buffer_percentage) / U256::from(100);
    debug!(%estimate, %buffered, buffer_percentage, "Deployment gas estimated.");
    Ok(buffered)
}
