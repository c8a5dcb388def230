// src/artifact.rs
// Loads the compiled contract artifact handed over by the external build step.

use ethers::abi::{Abi, ParamType, Token};
use ethers::types::{Bytes, I256, U256};
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::debug;

/// Hardhat-style artifact JSON, the shape the external build step emits.
#[derive(Debug, Deserialize)]
struct ArtifactJson {
    abi: Abi,
    bytecode: String,
}

/// Immutable deployment input: creation bytecode plus the ABI-encoded
/// constructor arguments. The init code is validated and pre-encoded at load
/// time so the submitter never deals with encoding failures.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub bytecode: Bytes,
    pub constructor_args: Vec<Token>,
    init_code: Bytes,
}

impl ContractArtifact {
    /// Reads an artifact from disk. A `.json` file is parsed as a
    /// Hardhat-style artifact (ABI + bytecode); anything else is treated as a
    /// raw hex bytecode file (trimmed, optional `0x` prefix).
    pub fn load(path: impl AsRef<Path>, raw_args: &[String]) -> Result<Self> {
        let path_ref = path.as_ref();
        debug!(path = %path_ref.display(), "Loading contract artifact.");

        if path_ref.extension().map_or(false, |ext| ext == "json") {
            let contents = fs::read_to_string(path_ref)
                .wrap_err_with(|| format!("Failed to read artifact file: {:?}", path_ref))?;
            let artifact: ArtifactJson = serde_json::from_str(&contents)
                .wrap_err_with(|| format!("Failed to parse artifact JSON: {:?}", path_ref))?;
            let bytecode = decode_bytecode_hex(&artifact.bytecode)?;
            Self::from_parts(bytecode, Some(artifact.abi), raw_args)
        } else {
            let bytecode_hex = fs::read_to_string(path_ref)
                .wrap_err_with(|| format!("Failed to read bytecode file: {:?}", path_ref))?;
            let bytecode = decode_bytecode_hex(&bytecode_hex)?;
            Self::from_parts(bytecode, None, raw_args)
        }
    }

    /// Builds an artifact from already-decoded parts. Constructor argument
    /// strings are parsed against the ABI constructor's parameter types;
    /// passing arguments without a constructor is an error.
    pub fn from_parts(bytecode: Bytes, abi: Option<Abi>, raw_args: &[String]) -> Result<Self> {
        if bytecode.is_empty() {
            eyre::bail!("Artifact bytecode is empty");
        }

        if raw_args.is_empty() {
            return Ok(Self {
                init_code: bytecode.clone(),
                bytecode,
                constructor_args: Vec::new(),
            });
        }

        let abi = abi.ok_or_else(|| eyre!("Constructor arguments given but artifact has no ABI"))?;
        let constructor = abi
            .constructor()
            .ok_or_else(|| eyre!("Constructor arguments given but ABI declares no constructor"))?;
        if constructor.inputs.len() != raw_args.len() {
            eyre::bail!(
                "Constructor expects {} argument(s), {} given",
                constructor.inputs.len(),
                raw_args.len()
            );
        }

        let constructor_args = constructor
            .inputs
            .iter()
            .zip(raw_args)
            .map(|(param, raw)| {
                parse_arg(&param.kind, raw)
                    .wrap_err_with(|| format!("Invalid value for constructor argument `{}`", param.name))
            })
            .collect::<Result<Vec<Token>>>()?;

        let init_code = constructor
            .encode_input(bytecode.to_vec(), &constructor_args)
            .wrap_err("Failed to ABI-encode constructor arguments")?;

        Ok(Self {
            bytecode,
            constructor_args,
            init_code: Bytes::from(init_code),
        })
    }

    /// Creation bytecode with constructor arguments appended.
    pub fn init_code(&self) -> &Bytes {
        &self.init_code
    }
}

fn decode_bytecode_hex(raw: &str) -> Result<Bytes> {
    let cleaned = raw.trim().trim_start_matches("0x");
    let decoded = hex::decode(cleaned).wrap_err("Failed to decode hex bytecode")?;
    Ok(Bytes::from(decoded))
}

/// Parses one constructor argument string into an ABI token. Covers the
/// scalar types a deployment constructor realistically takes; tuples and
/// arrays are rejected with a clear message.
fn parse_arg(kind: &ParamType, raw: &str) -> Result<Token> {
    match kind {
        ParamType::Address => Ok(Token::Address(raw.parse()?)),
        ParamType::Uint(_) => {
            let value = if let Some(hex_digits) = raw.strip_prefix("0x") {
                U256::from_str_radix(hex_digits, 16)?
            } else {
                U256::from_dec_str(raw)?
            };
            Ok(Token::Uint(value))
        }
        ParamType::Int(_) => Ok(Token::Int(I256::from_dec_str(raw)?.into_raw())),
        ParamType::Bool => Ok(Token::Bool(raw.parse()?)),
        ParamType::String => Ok(Token::String(raw.to_string())),
        ParamType::Bytes => Ok(Token::Bytes(hex::decode(raw.trim_start_matches("0x"))?)),
        ParamType::FixedBytes(len) => {
            let decoded = hex::decode(raw.trim_start_matches("0x"))?;
            if decoded.len() != *len {
                eyre::bail!("Expected {} byte(s), got {}", len, decoded.len());
            }
            Ok(Token::FixedBytes(decoded))
        }
        other => Err(eyre!("Unsupported constructor argument type: {}", other)),
    }
}
