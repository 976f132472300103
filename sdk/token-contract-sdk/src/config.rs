use crate::basic::submit::SubmitConfig;
use crate::core::constants::DEFAULT_PROGRAM_ID;
use crate::error::{Result, TokenSdkError};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";

/// Client settings, overridable through the environment:
/// `RPC_URL`, `KEYPAIR`, `DEPLOYER_KEYPAIR`, `PROGRAM_ID`, `COMMITMENT`,
/// `CONFIRM_TIMEOUT_SECS`, `POLL_INTERVAL_MS`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub keypair_path: PathBuf,
    /// Fee recipient keypair; `None` means the payer is the deployer
    pub deployer_keypair_path: Option<PathBuf>,
    pub program_id: Pubkey,
    pub commitment: CommitmentConfig,
    pub submit: SubmitConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            keypair_path: default_keypair_path(),
            deployer_keypair_path: None,
            program_id: DEFAULT_PROGRAM_ID,
            commitment: CommitmentConfig::confirmed(),
            submit: SubmitConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("RPC_URL") {
            config.rpc_url = url;
        }
        if let Some(path) = lookup("KEYPAIR") {
            config.keypair_path = expand_tilde(&path);
        }
        if let Some(path) = lookup("DEPLOYER_KEYPAIR") {
            config.deployer_keypair_path = Some(expand_tilde(&path));
        }
        if let Some(id) = lookup("PROGRAM_ID") {
            config.program_id = Pubkey::from_str(&id)
                .map_err(|e| TokenSdkError::Config(format!("PROGRAM_ID: {}", e)))?;
        }
        if let Some(level) = lookup("COMMITMENT") {
            config.commitment = parse_commitment(&level)?;
        }
        if let Some(secs) = lookup("CONFIRM_TIMEOUT_SECS") {
            config.submit.confirmation_timeout = Duration::from_secs(parse_number(
                "CONFIRM_TIMEOUT_SECS",
                &secs,
            )?);
        }
        if let Some(ms) = lookup("POLL_INTERVAL_MS") {
            config.submit.poll_interval =
                Duration::from_millis(parse_number("POLL_INTERVAL_MS", &ms)?);
        }

        Ok(config)
    }
}

pub fn parse_commitment(level: &str) -> Result<CommitmentConfig> {
    match level.to_ascii_lowercase().as_str() {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(TokenSdkError::Config(format!(
            "COMMITMENT: unknown level `{}`",
            other
        ))),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| TokenSdkError::Config(format!("{}: {}", key, e)))
}

/// Solana CLI default keypair location
pub fn default_keypair_path() -> PathBuf {
    expand_tilde("~/.config/solana/id.json")
}

fn expand_tilde(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
