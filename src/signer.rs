// src/signer.rs
// Signer resolution: picks the identity that will submit the deployment.

use crate::error::DeployError;
use ethers::signers::LocalWallet;
use tracing::debug;

/// Resolves the deployment signer from the configured key list.
///
/// Selection is deterministic: the first configured key wins. Multi-signer
/// selection is not supported, and an empty or unusable list is
/// `NoSignerAvailable`. The returned wallet still needs a chain id before it
/// can sign (`Signer::with_chain_id`).
pub fn resolve(private_keys: &[String]) -> Result<LocalWallet, DeployError> {
    let raw = private_keys
        .first()
        .ok_or_else(|| DeployError::NoSignerAvailable("no deployment keys configured".to_string()))?;

    let wallet = raw
        .parse::<LocalWallet>()
        .map_err(|e| DeployError::NoSignerAvailable(format!("first configured key is not a usable signer: {e}")))?;

    debug!(total_keys = private_keys.len(), "Signer resolved from first configured key.");
    Ok(wallet)
}
