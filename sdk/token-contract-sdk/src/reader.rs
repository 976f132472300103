use crate::core::connection::SolConnection;
use crate::core::constants::{TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::error::{Result, TokenSdkError};
use crate::types::{SecurityRecord, TokenRecord};
use crate::utils;
use borsh::BorshDeserialize;
use sha2::{Digest, Sha256};
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;

//=============================================================================
// Account Fetching
//=============================================================================

/// Fetch an account, mapping absence to `AccountNotFound`
pub async fn fetch_account(connection: &impl SolConnection, pubkey: &Pubkey) -> Result<Account> {
    connection
        .get_account(pubkey)
        .await
        .map_err(|e| TokenSdkError::Connection(e.to_string()))?
        .ok_or(TokenSdkError::AccountNotFound(*pubkey))
}

pub async fn account_exists(connection: &impl SolConnection, pubkey: &Pubkey) -> Result<bool> {
    Ok(connection
        .get_account(pubkey)
        .await
        .map_err(|e| TokenSdkError::Connection(e.to_string()))?
        .is_some())
}

/// Fetch and decode the mint and metadata accounts of a token.
///
/// `metadata` is the metadata account address; `None` means the Metaplex PDA
/// of `mint`. Tokens created with a signer-generated metadata account must
/// pass that address.
pub async fn fetch_token_record(
    connection: &impl SolConnection,
    mint: &Pubkey,
    metadata: Option<Pubkey>,
) -> Result<TokenRecord> {
    let metadata_address = match metadata {
        Some(address) => address,
        None => utils::derive_metadata_pda(mint)?.address,
    };

    let mint_account = fetch_account(connection, mint).await?;
    expect_owner(&mint_account, mint, &TOKEN_PROGRAM_ID)?;
    let mint_state = parse_mint(&mint_account.data)?;

    let metadata_account = fetch_account(connection, &metadata_address).await?;
    expect_owner(&metadata_account, &metadata_address, &TOKEN_METADATA_PROGRAM_ID)?;
    let metadata = parse_metadata(&metadata_account.data)?;

    if metadata.mint != *mint {
        return Err(TokenSdkError::InvalidAccountData(format!(
            "metadata {} references mint {}, expected {}",
            metadata_address, metadata.mint, mint
        )));
    }

    Ok(TokenRecord {
        mint: *mint,
        metadata: metadata_address,
        name: metadata.name,
        symbol: metadata.symbol,
        uri: metadata.uri,
        decimals: mint_state.decimals,
        supply: mint_state.supply,
        mint_authority: mint_state.mint_authority,
        freeze_authority: mint_state.freeze_authority,
        update_authority: metadata.update_authority,
        is_mutable: metadata.is_mutable,
    })
}

/// Fetch and decode the program security account
pub async fn fetch_security_record(
    connection: &impl SolConnection,
    program_id: &Pubkey,
) -> Result<SecurityRecord> {
    let address = utils::derive_security_pda(program_id)?.address;
    let account = fetch_account(connection, &address).await?;
    expect_owner(&account, &address, program_id)?;
    parse_security(&address, &account.data)
}

/// Fetch the program-created token account of `owner` for `mint`
pub async fn fetch_token_account(
    connection: &impl SolConnection,
    program_id: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<TokenAccountState> {
    let address = utils::derive_token_account_pda(program_id, owner, mint)?.address;
    let account = fetch_account(connection, &address).await?;
    expect_owner(&account, &address, &TOKEN_PROGRAM_ID)?;
    let state = parse_token_account(address, &account.data)?;

    if state.mint != *mint || state.owner != *owner {
        return Err(TokenSdkError::InvalidAccountData(format!(
            "token account {} holds mint {} for {}",
            address, state.mint, state.owner
        )));
    }
    Ok(state)
}

fn expect_owner(account: &Account, address: &Pubkey, owner: &Pubkey) -> Result<()> {
    if account.owner != *owner {
        return Err(TokenSdkError::InvalidAccountData(format!(
            "{} is owned by {}, expected {}",
            address, account.owner, owner
        )));
    }
    Ok(())
}

//=============================================================================
// Layout Parsing
//=============================================================================

/// SPL token mint fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintState {
    pub mint_authority: Option<Pubkey>,
    pub supply: u64,
    pub decimals: u8,
    pub is_initialized: bool,
    pub freeze_authority: Option<Pubkey>,
}

pub const MINT_LEN: usize = 82;

/// Parse an SPL token mint.
///
/// Layout:
/// ```text
/// [0..36]  mint_authority: COption<Pubkey>
/// [36..44] supply: u64
/// [44]     decimals: u8
/// [45]     is_initialized: bool
/// [46..82] freeze_authority: COption<Pubkey>
/// ```
pub fn parse_mint(data: &[u8]) -> Result<MintState> {
    if data.len() < MINT_LEN {
        return Err(TokenSdkError::InvalidAccountData(format!(
            "mint data is {} bytes, expected {}",
            data.len(),
            MINT_LEN
        )));
    }

    let mut supply = [0u8; 8];
    supply.copy_from_slice(&data[36..44]);

    let state = MintState {
        mint_authority: parse_coption_pubkey(&data[0..36])?,
        supply: u64::from_le_bytes(supply),
        decimals: data[44],
        is_initialized: data[45] == 1,
        freeze_authority: parse_coption_pubkey(&data[46..82])?,
    };

    if !state.is_initialized {
        return Err(TokenSdkError::InvalidAccountData(
            "mint is not initialized".to_string(),
        ));
    }
    Ok(state)
}

fn parse_coption_pubkey(data: &[u8]) -> Result<Option<Pubkey>> {
    let mut tag = [0u8; 4];
    tag.copy_from_slice(&data[0..4]);
    match u32::from_le_bytes(tag) {
        0 => Ok(None),
        1 => Pubkey::try_from(&data[4..36])
            .map(Some)
            .map_err(|e| TokenSdkError::InvalidAccountData(e.to_string())),
        other => Err(TokenSdkError::InvalidAccountData(format!(
            "invalid option tag {}",
            other
        ))),
    }
}

/// SPL token account fields the SDK reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccountState {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

pub const TOKEN_ACCOUNT_LEN: usize = 165;

/// `[0..32]` mint, `[32..64]` owner, `[64..72]` amount; the rest is not read
pub fn parse_token_account(address: Pubkey, data: &[u8]) -> Result<TokenAccountState> {
    if data.len() < TOKEN_ACCOUNT_LEN {
        return Err(TokenSdkError::InvalidAccountData(format!(
            "token account data is {} bytes, expected {}",
            data.len(),
            TOKEN_ACCOUNT_LEN
        )));
    }
    let mut amount = [0u8; 8];
    amount.copy_from_slice(&data[64..72]);

    Ok(TokenAccountState {
        address,
        mint: Pubkey::try_from(&data[0..32])
            .map_err(|e| TokenSdkError::InvalidAccountData(e.to_string()))?,
        owner: Pubkey::try_from(&data[32..64])
            .map_err(|e| TokenSdkError::InvalidAccountData(e.to_string()))?,
        amount: u64::from_le_bytes(amount),
    })
}

/// Metaplex metadata fields the SDK reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataState {
    pub update_authority: Pubkey,
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
}

/// Account key tag of a Metaplex `MetadataV1` account
pub const METADATA_V1_KEY: u8 = 4;

#[derive(BorshDeserialize)]
struct CreatorLayout {
    _address: [u8; 32],
    _verified: bool,
    _share: u8,
}

// Leading fields of the Metaplex metadata account; trailing fields are not read
#[derive(BorshDeserialize)]
struct MetadataLayout {
    key: u8,
    update_authority: [u8; 32],
    mint: [u8; 32],
    name: String,
    symbol: String,
    uri: String,
    seller_fee_basis_points: u16,
    _creators: Option<Vec<CreatorLayout>>,
    primary_sale_happened: bool,
    is_mutable: bool,
}

pub fn parse_metadata(data: &[u8]) -> Result<MetadataState> {
    let layout = MetadataLayout::deserialize(&mut &data[..]).map_err(|e| {
        TokenSdkError::InvalidAccountData(format!("Failed to parse metadata: {}", e))
    })?;

    if layout.key != METADATA_V1_KEY {
        return Err(TokenSdkError::InvalidAccountData(format!(
            "unexpected metadata key {}",
            layout.key
        )));
    }

    Ok(MetadataState {
        update_authority: Pubkey::new_from_array(layout.update_authority),
        mint: Pubkey::new_from_array(layout.mint),
        name: trim_padding(layout.name),
        symbol: trim_padding(layout.symbol),
        uri: trim_padding(layout.uri),
        seller_fee_basis_points: layout.seller_fee_basis_points,
        primary_sale_happened: layout.primary_sale_happened,
        is_mutable: layout.is_mutable,
    })
}

// Metaplex pads strings to fixed widths with NUL bytes
fn trim_padding(value: String) -> String {
    value.trim_end_matches('\0').to_string()
}

/// Anchor account discriminator: `sha256("account:<Name>")[..8]`
pub fn account_discriminator(name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("account:{}", name).as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

#[derive(BorshDeserialize)]
struct SecurityLayout {
    version: u32,
    admin: [u8; 32],
    security_txt: String,
    last_updated: i64,
}

pub fn parse_security(address: &Pubkey, data: &[u8]) -> Result<SecurityRecord> {
    if data.len() < 8 || data[..8] != account_discriminator("ProgramSecurity") {
        return Err(TokenSdkError::InvalidAccountData(
            "not a ProgramSecurity account".to_string(),
        ));
    }
    let layout = SecurityLayout::deserialize(&mut &data[8..]).map_err(|e| {
        TokenSdkError::InvalidAccountData(format!("Failed to parse security account: {}", e))
    })?;

    Ok(SecurityRecord {
        address: *address,
        version: layout.version,
        admin: Pubkey::new_from_array(layout.admin),
        security_txt: layout.security_txt,
        last_updated: layout.last_updated,
    })
}

//=============================================================================
// Expectations
//=============================================================================

/// Expected token fields; unset fields are not compared
#[derive(Debug, Clone, Default)]
pub struct TokenExpectation {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub authority: Option<Pubkey>,
}

impl TokenExpectation {
    /// Names of the fields that differ from the record
    pub fn mismatches(&self, record: &TokenRecord) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.as_ref().is_some_and(|v| *v != record.name) {
            fields.push("name");
        }
        if self.symbol.as_ref().is_some_and(|v| *v != record.symbol) {
            fields.push("symbol");
        }
        if self.decimals.is_some_and(|v| v != record.decimals) {
            fields.push("decimals");
        }
        if self.authority.is_some_and(|v| v != record.authority()) {
            fields.push("authority");
        }
        fields
    }
}
