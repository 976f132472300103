// Example: Creating a token with metadata
//
// This example demonstrates how to:
// 1. Load the client settings, the payer and the fee recipient keypairs
// 2. Create a token with a fresh mint keypair
// 3. Read the token back once the transaction is confirmed
//
// Run against a local validator with the program deployed:
//   RPC_URL=http://127.0.0.1:8899 cargo run --example create_token
//
// The program only accepts its configured deployer as fee recipient; point
// DEPLOYER_KEYPAIR at that keypair unless the payer is the deployer.

use solana_sdk::signature::{Keypair, Signer};
use token_contract_sdk::{
    advanced::instructions::CreateTokenArgs, keyfile, ClientConfig, RpcConnection, TokenProgram,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // 1. Settings from the environment, payer from the Solana CLI keypair
    let config = ClientConfig::from_env()?;
    let payer = keyfile::read_keypair(&config.keypair_path)?;
    let deployer = config
        .deployer_keypair_path
        .as_deref()
        .map(keyfile::read_keypair)
        .transpose()?;
    let deployer = deployer.as_ref().unwrap_or(&payer);
    let connection = RpcConnection::new(config.rpc_url.clone(), config.commitment);

    let program = TokenProgram::new(&connection)
        .with_program_id(config.program_id)
        .with_submit_config(config.submit);

    // 2. Create the token; the mint and deployer sign alongside the payer
    let mint = Keypair::new();
    let args = CreateTokenArgs::new("First Token", "FTK", 9);
    let created = program.create_token(&payer, deployer, &mint, args).await?;

    println!("Token created!");
    println!("  Mint: {}", created.mint);
    println!("  Metadata: {}", created.metadata);
    println!("  Token Account: {}", created.token_account);
    println!("  Signature: {}", created.confirmation.signature);

    // 3. Read it back
    let record = program.fetch_token(&mint.pubkey()).await?;
    println!("  Name: {}", record.name);
    println!("  Symbol: {}", record.symbol);
    println!("  Decimals: {}", record.decimals);
    println!("  Authority: {}", record.authority());

    Ok(())
}
