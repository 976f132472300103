// Example: Fetching a token and the program security record
//
//   MINT=<address> cargo run --example fetch_token

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use token_contract_sdk::{ClientConfig, RpcConnection, TokenProgram, TokenSdkError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::from_env()?;
    let mint = Pubkey::from_str(&std::env::var("MINT")?)?;
    let connection = RpcConnection::new(config.rpc_url.clone(), config.commitment);
    let program = TokenProgram::new(&connection).with_program_id(config.program_id);

    let record = program.fetch_token(&mint).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    match program.fetch_security().await {
        Ok(security) => {
            println!("\nProgram security (version {}):", security.version);
            println!("  Admin: {}", security.admin);
            println!("{}", security.security_txt);
        },
        Err(TokenSdkError::AccountNotFound(address)) => {
            println!("\nSecurity account {} not initialized", address);
        },
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
