// src/lib.rs
// Library interface for the single-artifact contract deployer.

pub mod artifact;
pub mod config;
pub mod confirm;
pub mod deploy;
pub mod error;
pub mod gas;
pub mod signer;
pub mod workflow;

// Re-export the types the binary and integration tests work with.
pub use artifact::ContractArtifact;
pub use config::{load_config, Config};
pub use error::DeployError;
pub use workflow::{run_deployment, DeploymentRecord, PendingDeployment};
