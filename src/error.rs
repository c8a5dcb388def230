// src/error.rs
// Error taxonomy for the deployment workflow.

use ethers::providers::MiddlewareError;
use ethers::types::TxHash;
use thiserror::Error;

/// Terminal failures of a deployment run. None of these are retried
/// internally; the caller maps any of them to a non-zero exit status.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The configured signer provider yielded no usable identity.
    #[error("no signer available: {0}")]
    NoSignerAvailable(String),

    /// The node synchronously rejected the deployment transaction
    /// (malformed payload, insufficient balance, estimation revert).
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// The transport could not reach the network at all. Safe to retry the
    /// whole pipeline from the top.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The creation transaction was included but reverted, or the receipt
    /// carried no contract address.
    #[error("deployment reverted on-chain, tx {tx_hash:?}")]
    DeploymentFailedOnChain { tx_hash: TxHash },

    /// No confirmation arrived within the configured deadline. The original
    /// transaction may still confirm later, so it must NOT be resubmitted
    /// blindly; the hash is kept for manual follow-up.
    #[error("no confirmation for tx {tx_hash:?} within {timeout_secs}s")]
    ConfirmationTimeout { tx_hash: TxHash, timeout_secs: u64 },
}

impl DeployError {
    /// Stable kind label used in logs and the final error line.
    pub fn kind(&self) -> &'static str {
        match self {
            DeployError::NoSignerAvailable(_) => "NoSignerAvailable",
            DeployError::SubmissionRejected(_) => "SubmissionRejected",
            DeployError::NetworkUnavailable(_) => "NetworkUnavailable",
            DeployError::DeploymentFailedOnChain { .. } => "DeploymentFailedOnChain",
            DeployError::ConfirmationTimeout { .. } => "ConfirmationTimeout",
        }
    }

    /// Wraps a pre-submission RPC failure (chain id, nonce) where any error
    /// means the network could not be used.
    pub(crate) fn network<E: std::fmt::Display>(err: E) -> Self {
        DeployError::NetworkUnavailable(err.to_string())
    }
}

/// Splits a send-path middleware error into its terminal kind: a JSON-RPC
/// error response means the node saw and rejected the payload; anything else
/// is transport trouble.
pub(crate) fn classify_rpc_error<E: MiddlewareError>(err: &E) -> DeployError {
    match err.as_error_response() {
        Some(rpc) => DeployError::SubmissionRejected(format!("{} (code {})", rpc.message, rpc.code)),
        None => DeployError::NetworkUnavailable(err.to_string()),
    }
}
