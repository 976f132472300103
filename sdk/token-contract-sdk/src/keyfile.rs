//! Solana CLI keypair files and their wallet-import encodings.

use crate::error::{Result, TokenSdkError};
use solana_sdk::signature::{read_keypair_file, Keypair};
use std::path::Path;

/// Load the JSON byte array written by `solana-keygen`
pub fn read_keypair(path: &Path) -> Result<Keypair> {
    read_keypair_file(path)
        .map_err(|e| TokenSdkError::Config(format!("{}: {}", path.display(), e)))
}

/// Base58 form accepted by browser wallets
pub fn to_base58(keypair: &Keypair) -> String {
    keypair.to_base58_string()
}

/// Byte-array form, as printed by `Array.from`
pub fn to_byte_list(keypair: &Keypair) -> String {
    let items: Vec<String> = keypair.to_bytes().iter().map(|b| b.to_string()).collect();
    format!("[{}]", items.join(","))
}
