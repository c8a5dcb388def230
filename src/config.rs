// src/config.rs

use ethers::types::U256;
use ethers::utils::parse_units;
use eyre::{Result, WrapErr};
use std::env;
use dotenv::dotenv;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Config {
    // Network & Keys
    pub http_rpc_url: String,
    pub chain_id: Option<u64>,
    pub private_keys: Vec<String>,

    // Artifact
    pub artifact_path: Option<String>,
    pub constructor_args: Vec<String>,

    // Confirmation Policy
    pub confirmations: u64,
    pub confirmation_timeout_secs: u64,
    pub receipt_poll_interval_ms: u64,

    // Gas Pricing Options (wei, converted once at load time)
    pub gas_limit: Option<u64>,
    pub gas_limit_buffer_percentage: u64,
    pub max_priority_fee_per_gas: U256,
    pub fallback_gas_price: Option<U256>,
    pub gas_price_override: Option<U256>,
}

pub fn load_config() -> Result<Config> {
    debug!("Loading configuration from environment / .env file...");
    dotenv().ok();

    let parse_u64_env = |var_name: &str, default: u64| -> u64 {
        env::var(var_name).ok().and_then(|s| s.parse::<u64>().ok()).unwrap_or(default)
    };
    let parse_f64_env = |var_name: &str, default: f64| -> f64 {
        env::var(var_name).ok().and_then(|s| s.parse::<f64>().ok()).unwrap_or(default)
    };
    let parse_optional_u64 = |var_name: &str| -> Result<Option<u64>> {
        match env::var(var_name) {
            Ok(val_str) if !val_str.is_empty() => Ok(Some(val_str.parse::<u64>()?)),
            _ => Ok(None),
        }
    };
    let parse_optional_f64 = |var_name: &str| -> Result<Option<f64>> {
        match env::var(var_name) {
            Ok(val_str) if !val_str.is_empty() => Ok(Some(val_str.parse::<f64>()?)),
            _ => Ok(None),
        }
    };
    let parse_list_env = |var_name: &str| -> Vec<String> {
        env::var(var_name)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    };
    let gwei_to_wei = |gwei: f64, var_name: &str| -> Result<U256> {
        if gwei < 0.0 {
            eyre::bail!("{} must not be negative", var_name);
        }
        let wei: U256 = parse_units(gwei.to_string(), "gwei")
            .wrap_err_with(|| format!("Invalid gwei value in {}", var_name))?
            .into();
        Ok(wei)
    };

    // --- Load vars ---
    let http_rpc_url = env::var("HTTP_RPC_URL").wrap_err("HTTP_RPC_URL must be set")?;
    let chain_id = parse_optional_u64("CHAIN_ID")?;
    // May be empty; the signer resolver reports NoSignerAvailable in that case.
    let private_keys = parse_list_env("DEPLOYER_PRIVATE_KEYS");

    let artifact_path = env::var("ARTIFACT_PATH").ok().filter(|s| !s.is_empty());
    let constructor_args = parse_list_env("CONSTRUCTOR_ARGS");

    let confirmations = parse_u64_env("CONFIRMATIONS", 1).max(1);
    let confirmation_timeout_secs = parse_u64_env("CONFIRMATION_TIMEOUT_SECS", 60);
    let receipt_poll_interval_ms = parse_u64_env("RECEIPT_POLL_INTERVAL_MS", 5000);

    let gas_limit = parse_optional_u64("GAS_LIMIT")?;
    let gas_limit_buffer_percentage = parse_u64_env("GAS_LIMIT_BUFFER_PERCENTAGE", 20);
    let max_priority_fee_per_gas =
        gwei_to_wei(parse_f64_env("MAX_PRIORITY_FEE_PER_GAS_GWEI", 1.0), "MAX_PRIORITY_FEE_PER_GAS_GWEI")?;
    let fallback_gas_price = parse_optional_f64("GAS_PRICE_FALLBACK_GWEI")?
        .map(|g| gwei_to_wei(g, "GAS_PRICE_FALLBACK_GWEI"))
        .transpose()?;
    let gas_price_override = parse_optional_f64("GAS_PRICE_GWEI_OVERRIDE")?
        .map(|g| gwei_to_wei(g, "GAS_PRICE_GWEI_OVERRIDE"))
        .transpose()?;

    let config = Config {
        http_rpc_url, chain_id, private_keys,
        artifact_path, constructor_args,
        confirmations, confirmation_timeout_secs, receipt_poll_interval_ms,
        gas_limit, gas_limit_buffer_percentage,
        max_priority_fee_per_gas, fallback_gas_price, gas_price_override,
    };

    debug!(?config.chain_id, confirmations = config.confirmations, "Configuration loaded successfully.");
    Ok(config)
}
// END OF FILE: src/config.rs
