//! Print a Solana CLI keypair file in the forms browser wallets import.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use token_contract_sdk::config::default_keypair_path;
use solana_sdk::signature::Signer;
use token_contract_sdk::keyfile;
use tracing::info;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert a keypair file for wallet import", long_about = None)]
struct Args {
    /// Keypair JSON file written by solana-keygen
    #[arg(short, long, env = "KEYPAIR")]
    keypair: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "convert_key=debug,info" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let path = args.keypair.unwrap_or_else(default_keypair_path);
    info!(path = %path.display(), "reading keypair");

    let keypair = keyfile::read_keypair(&path)
        .with_context(|| format!("failed to load keypair from {}", path.display()))?;
    info!(pubkey = %keypair.pubkey(), "keypair loaded");

    println!("Private Key (Base58): {}", keyfile::to_base58(&keypair));
    println!("Private Key (Bytes): {}", keyfile::to_byte_list(&keypair));
    Ok(())
}
