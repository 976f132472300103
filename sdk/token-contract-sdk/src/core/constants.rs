use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

// Default Program ID for the deployed token contract
pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("AkugdJHDjDvBaxUGC6pjyrfqEpDfJ4Z9Ji9NED6Lmddg");

/// Fee recipient the program transfers the creation fee to.
pub const DEPLOYER_PUBKEY: Pubkey = pubkey!("6oKdNekVDKYPeBLeCs33DttaMaVwzxeHJBfroPZeWwGk");

pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// Lamports charged by `create_token` (0.01 SOL).
pub const CREATE_TOKEN_FEE_LAMPORTS: u64 = 10_000_000;

/// Largest decimals value the program accepts for a mint.
pub const MAX_DECIMALS: u8 = 9;

//=============================================================================
// Seeds
//=============================================================================

pub const METADATA_SEED: &[u8] = b"metadata";
pub const TOKEN_ACCOUNT_SEED: &[u8] = b"token-account";
pub const SECURITY_SEED: &[u8] = b"program-security";

//=============================================================================
// Address space limits
//=============================================================================

/// Maximum length of a single seed segment.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum seed segments per derivation, bump included.
pub const MAX_SEEDS: usize = 16;

/// Maximum size of a serialized transaction (one network packet).
pub const PACKET_DATA_SIZE: usize = 1232;
