#![allow(dead_code)]

use async_trait::async_trait;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    instruction::InstructionError,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::{Transaction, TransactionError},
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use token_contract_sdk::advanced::instructions::EntryPoint;
use token_contract_sdk::core::connection::{ConnectionError, ConnectionResult, SignatureState};
use token_contract_sdk::core::constants::{
    CREATE_TOKEN_FEE_LAMPORTS, DEFAULT_PROGRAM_ID, MAX_DECIMALS, TOKEN_METADATA_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
use token_contract_sdk::reader::{
    account_discriminator, METADATA_V1_KEY, MINT_LEN, TOKEN_ACCOUNT_LEN,
};
use token_contract_sdk::{utils, Finality, ProgramErrorCode, SolConnection, SubmitConfig};
use tokio::sync::Mutex;

/// Blocks a blockhash stays valid for, as on mainnet
pub const BLOCKHASH_VALIDITY: u64 = 150;

pub const STARTING_BALANCE: u64 = 10_000_000_000;

pub const DEFAULT_SECURITY_TXT: &str = "Contact: support@example.org";

const NAME_WIDTH: usize = 32;
const SYMBOL_WIDTH: usize = 10;
const URI_WIDTH: usize = 200;

#[derive(BorshSerialize)]
struct MetadataV1 {
    key: u8,
    update_authority: [u8; 32],
    mint: [u8; 32],
    name: String,
    symbol: String,
    uri: String,
    seller_fee_basis_points: u16,
    creators: Option<Vec<u8>>,
    primary_sale_happened: bool,
    is_mutable: bool,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct ProgramSecurity {
    version: u32,
    admin: [u8; 32],
    security_txt: String,
    last_updated: i64,
}

struct CreateTokenInput {
    name: String,
    symbol: String,
    decimals: u8,
    uri: String,
    initial_supply: u64,
    revoke_mint: bool,
    revoke_freeze: bool,
    revoke_update: bool,
}

struct ClusterState {
    accounts: HashMap<Pubkey, Account>,
    block_height: u64,
    slot: u64,
    clock: i64,
    current_blockhash: Hash,
    blockhashes: HashMap<Hash, u64>,
    statuses: HashMap<Signature, SignatureState>,
    holding: bool,
    held: Vec<Transaction>,
}

/// In-memory cluster that runs the token contract's entry points.
///
/// Each transaction is applied all-or-nothing: state is only written once every
/// check has passed. `deployer` plays the fee recipient compiled into the
/// program; `create_token` only accepts it in slot 1.
pub struct MockCluster {
    pub program_id: Pubkey,
    pub deployer: Keypair,
    commitment: CommitmentConfig,
    state: Mutex<ClusterState>,
    calls: AtomicUsize,
}

impl MockCluster {
    pub fn new() -> Self {
        Self::with_program_id(DEFAULT_PROGRAM_ID)
    }

    pub fn with_program_id(program_id: Pubkey) -> Self {
        let genesis = Hash::new_unique();
        let mut blockhashes = HashMap::new();
        blockhashes.insert(genesis, BLOCKHASH_VALIDITY);

        Self {
            program_id,
            deployer: Keypair::new(),
            commitment: CommitmentConfig::confirmed(),
            state: Mutex::new(ClusterState {
                accounts: HashMap::new(),
                block_height: 0,
                slot: 1,
                clock: 1_700_000_000,
                current_blockhash: genesis,
                blockhashes,
                statuses: HashMap::new(),
                holding: false,
                held: Vec::new(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Report landed transactions at `commitment`
    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }

    /// Number of `SolConnection` calls served so far
    pub fn network_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn airdrop(&self, pubkey: &Pubkey, lamports: u64) {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .entry(*pubkey)
            .or_insert_with(|| Account::new(0, 0, &solana_sdk::system_program::id()));
        account.lamports += lamports;
    }

    pub async fn funded_payer(&self) -> Keypair {
        let payer = Keypair::new();
        self.airdrop(&payer.pubkey(), STARTING_BALANCE).await;
        payer
    }

    pub async fn balance(&self, pubkey: &Pubkey) -> u64 {
        let state = self.state.lock().await;
        state.accounts.get(pubkey).map(|a| a.lamports).unwrap_or(0)
    }

    /// Accept transactions but keep them unprocessed until `release`
    pub async fn hold(&self) {
        self.state.lock().await.holding = true;
    }

    /// Process every held transaction and resume normal operation
    pub async fn release(&self) {
        let mut state = self.state.lock().await;
        state.holding = false;
        let held = std::mem::take(&mut state.held);
        for tx in held {
            let signature = tx.signatures[0];
            let status = self.apply(&mut state, &tx);
            state.statuses.insert(signature, status);
        }
    }

    /// Advance the chain, producing a new blockhash
    pub async fn advance_blocks(&self, blocks: u64) {
        let mut state = self.state.lock().await;
        state.block_height += blocks;
        state.slot += blocks;
        state.clock += blocks as i64;
        let next = Hash::new_unique();
        let last_valid = state.block_height + BLOCKHASH_VALIDITY;
        state.blockhashes.insert(next, last_valid);
        state.current_blockhash = next;
    }

    /// Move past the validity window of every blockhash issued so far
    pub async fn expire_blockhashes(&self) {
        self.advance_blocks(BLOCKHASH_VALIDITY + 1).await;
    }

    fn admit(&self, state: &ClusterState, tx: &Transaction) -> ConnectionResult<()> {
        tx.verify()
            .map_err(|_| ConnectionError::Transaction(TransactionError::SignatureFailure))?;
        match state.blockhashes.get(&tx.message.recent_blockhash) {
            Some(last_valid) if *last_valid >= state.block_height => Ok(()),
            _ => Err(ConnectionError::Transaction(
                TransactionError::BlockhashNotFound,
            )),
        }
    }

    fn apply(&self, state: &mut ClusterState, tx: &Transaction) -> SignatureState {
        state.slot += 1;
        let slot = state.slot;
        match self.execute(state, tx) {
            Ok(()) => SignatureState::Landed {
                slot,
                finality: Finality::from(self.commitment),
            },
            Err(error) => SignatureState::Failed { slot, error },
        }
    }

    fn execute(&self, state: &mut ClusterState, tx: &Transaction) -> Result<(), TransactionError> {
        let message = &tx.message;
        for (index, ix) in message.instructions.iter().enumerate() {
            let index = index as u8;
            let program = message.account_keys[ix.program_id_index as usize];
            if program != self.program_id {
                return Err(TransactionError::InstructionError(
                    index,
                    InstructionError::IncorrectProgramId,
                ));
            }
            let keys: Vec<Pubkey> = ix
                .accounts
                .iter()
                .map(|i| message.account_keys[*i as usize])
                .collect();
            let signed: Vec<bool> = ix
                .accounts
                .iter()
                .map(|i| message.is_signer(*i as usize))
                .collect();

            let fail = |e: InstructionError| TransactionError::InstructionError(index, e);
            if ix.data.len() < 8 {
                return Err(fail(InstructionError::InvalidInstructionData));
            }
            let (disc, mut args) = ix.data.split_at(8);
            let entry_point = [
                EntryPoint::CreateToken,
                EntryPoint::InitializeSecurity,
                EntryPoint::UpgradeSecurity,
            ]
            .into_iter()
            .find(|ep| ep.discriminator() == disc)
            .ok_or_else(|| fail(InstructionError::InvalidInstructionData))?;

            match entry_point {
                EntryPoint::CreateToken => {
                    let input = decode_create_token(&mut args)
                        .ok_or_else(|| fail(InstructionError::InvalidInstructionData))?;
                    self.create_token(state, &keys, &signed, input)
                        .map_err(fail)?;
                },
                EntryPoint::InitializeSecurity => {
                    self.initialize_security(state, &keys, &signed)
                        .map_err(fail)?;
                },
                EntryPoint::UpgradeSecurity => {
                    let new_txt = String::deserialize(&mut args)
                        .map_err(|_| fail(InstructionError::InvalidInstructionData))?;
                    self.upgrade_security(state, &keys, &signed, new_txt)
                        .map_err(fail)?;
                },
            }
        }
        Ok(())
    }

    fn create_token(
        &self,
        state: &mut ClusterState,
        keys: &[Pubkey],
        signed: &[bool],
        input: CreateTokenInput,
    ) -> Result<(), InstructionError> {
        if keys.len() < 10 {
            return Err(InstructionError::NotEnoughAccountKeys);
        }
        let (payer, deployer, mint, metadata, token_account) =
            (keys[0], keys[1], keys[2], keys[3], keys[4]);
        if !signed[0] || !signed[1] || !signed[2] {
            return Err(InstructionError::MissingRequiredSignature);
        }
        // The fee transfer targets the compiled-in recipient
        if deployer != self.deployer.pubkey() {
            return Err(InstructionError::MissingAccount);
        }
        if keys[8] != TOKEN_METADATA_PROGRAM_ID || keys[9] != TOKEN_PROGRAM_ID {
            return Err(InstructionError::IncorrectProgramId);
        }
        if input.decimals > MAX_DECIMALS {
            return Err(InstructionError::Custom(ProgramErrorCode::InvalidDecimals.code()));
        }
        let expected_metadata = utils::derive_metadata_pda(&mint)
            .map_err(|_| InstructionError::InvalidSeeds)?
            .address;
        if metadata != expected_metadata && !signed[3] {
            return Err(InstructionError::InvalidSeeds);
        }
        let expected_token_account = utils::derive_token_account_pda(&self.program_id, &payer, &mint)
            .map_err(|_| InstructionError::InvalidSeeds)?
            .address;
        if token_account != expected_token_account {
            return Err(InstructionError::InvalidSeeds);
        }
        if state.accounts.contains_key(&mint) {
            return Err(InstructionError::AccountAlreadyInitialized);
        }
        let minted = 10u64
            .checked_pow(input.decimals as u32)
            .and_then(|scale| input.initial_supply.checked_mul(scale))
            .ok_or(InstructionError::ArithmeticOverflow)?;
        let balance = state.accounts.get(&payer).map(|a| a.lamports).unwrap_or(0);
        if balance < CREATE_TOKEN_FEE_LAMPORTS {
            return Err(InstructionError::Custom(ProgramErrorCode::InsufficientFunds.code()));
        }

        let mut mint_data = vec![0u8; MINT_LEN];
        if !input.revoke_mint {
            mint_data[0..4].copy_from_slice(&1u32.to_le_bytes());
            mint_data[4..36].copy_from_slice(payer.as_ref());
        }
        mint_data[36..44].copy_from_slice(&minted.to_le_bytes());
        mint_data[44] = input.decimals;
        mint_data[45] = 1;
        if !input.revoke_freeze {
            mint_data[46..50].copy_from_slice(&1u32.to_le_bytes());
            mint_data[50..82].copy_from_slice(payer.as_ref());
        }

        let update_authority = if input.revoke_update {
            Pubkey::default()
        } else {
            payer
        };
        let metadata_data = borsh::to_vec(&MetadataV1 {
            key: METADATA_V1_KEY,
            update_authority: update_authority.to_bytes(),
            mint: mint.to_bytes(),
            name: pad(&input.name, NAME_WIDTH),
            symbol: pad(&input.symbol, SYMBOL_WIDTH),
            uri: pad(&input.uri, URI_WIDTH),
            seller_fee_basis_points: 0,
            creators: None,
            primary_sale_happened: false,
            is_mutable: !input.revoke_update,
        })
        .map_err(|_| InstructionError::AccountDataTooSmall)?;

        let mut token_data = vec![0u8; TOKEN_ACCOUNT_LEN];
        token_data[0..32].copy_from_slice(mint.as_ref());
        token_data[32..64].copy_from_slice(payer.as_ref());
        token_data[64..72].copy_from_slice(&minted.to_le_bytes());

        // All checks passed; commit
        if let Some(account) = state.accounts.get_mut(&payer) {
            account.lamports -= CREATE_TOKEN_FEE_LAMPORTS;
        }
        state
            .accounts
            .entry(deployer)
            .or_insert_with(|| Account::new(0, 0, &solana_sdk::system_program::id()))
            .lamports += CREATE_TOKEN_FEE_LAMPORTS;
        state
            .accounts
            .insert(mint, data_account(mint_data, &TOKEN_PROGRAM_ID));
        state
            .accounts
            .insert(metadata, data_account(metadata_data, &TOKEN_METADATA_PROGRAM_ID));
        state
            .accounts
            .insert(token_account, data_account(token_data, &TOKEN_PROGRAM_ID));
        Ok(())
    }

    fn initialize_security(
        &self,
        state: &mut ClusterState,
        keys: &[Pubkey],
        signed: &[bool],
    ) -> Result<(), InstructionError> {
        if keys.len() < 3 {
            return Err(InstructionError::NotEnoughAccountKeys);
        }
        let (security, authority) = (keys[0], keys[1]);
        if !signed[1] {
            return Err(InstructionError::MissingRequiredSignature);
        }
        self.check_security_address(&security)?;
        if state.accounts.contains_key(&security) {
            return Err(InstructionError::Custom(ProgramErrorCode::AlreadyInitialized.code()));
        }

        let record = ProgramSecurity {
            version: 0,
            admin: authority.to_bytes(),
            security_txt: DEFAULT_SECURITY_TXT.to_string(),
            last_updated: state.clock,
        };
        state
            .accounts
            .insert(security, data_account(security_bytes(&record)?, &self.program_id));
        Ok(())
    }

    fn upgrade_security(
        &self,
        state: &mut ClusterState,
        keys: &[Pubkey],
        signed: &[bool],
        new_txt: String,
    ) -> Result<(), InstructionError> {
        if keys.len() < 2 {
            return Err(InstructionError::NotEnoughAccountKeys);
        }
        let (security, authority) = (keys[0], keys[1]);
        if !signed[1] {
            return Err(InstructionError::MissingRequiredSignature);
        }
        self.check_security_address(&security)?;

        let clock = state.clock;
        let account = state
            .accounts
            .get_mut(&security)
            .ok_or(InstructionError::UninitializedAccount)?;
        let mut record = ProgramSecurity::deserialize(&mut &account.data[8..])
            .map_err(|_| InstructionError::InvalidAccountData)?;
        if record.admin != authority.to_bytes() {
            return Err(InstructionError::Custom(ProgramErrorCode::Unauthorized.code()));
        }

        record.version += 1;
        record.security_txt = new_txt;
        record.last_updated = clock;
        account.data = security_bytes(&record)?;
        Ok(())
    }

    fn check_security_address(&self, security: &Pubkey) -> Result<(), InstructionError> {
        let expected = utils::derive_security_pda(&self.program_id)
            .map_err(|_| InstructionError::InvalidSeeds)?
            .address;
        if *security != expected {
            return Err(InstructionError::InvalidSeeds);
        }
        Ok(())
    }
}

impl Default for MockCluster {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_create_token(args: &mut &[u8]) -> Option<CreateTokenInput> {
    let name = String::deserialize(args).ok()?;
    let symbol = String::deserialize(args).ok()?;
    let decimals = u8::deserialize(args).ok()?;
    let mut input = CreateTokenInput {
        name,
        symbol,
        decimals,
        uri: String::new(),
        initial_supply: 0,
        revoke_mint: false,
        revoke_freeze: false,
        revoke_update: false,
    };
    if args.is_empty() {
        return Some(input);
    }
    input.uri = String::deserialize(args).ok()?;
    if args.is_empty() {
        return Some(input);
    }
    input.initial_supply = u64::deserialize(args).ok()?;
    if args.is_empty() {
        return Some(input);
    }
    input.revoke_mint = bool::deserialize(args).ok()?;
    input.revoke_freeze = bool::deserialize(args).ok()?;
    input.revoke_update = bool::deserialize(args).ok()?;
    args.is_empty().then_some(input)
}

fn pad(value: &str, width: usize) -> String {
    let mut padded = value.to_string();
    while padded.len() < width {
        padded.push('\0');
    }
    padded
}

fn data_account(data: Vec<u8>, owner: &Pubkey) -> Account {
    Account {
        lamports: 1_000_000,
        data,
        owner: *owner,
        executable: false,
        rent_epoch: 0,
    }
}

fn security_bytes(record: &ProgramSecurity) -> Result<Vec<u8>, InstructionError> {
    let mut data = account_discriminator("ProgramSecurity").to_vec();
    record
        .serialize(&mut data)
        .map_err(|_| InstructionError::AccountDataTooSmall)?;
    Ok(data)
}

#[async_trait]
impl SolConnection for MockCluster {
    async fn get_latest_blockhash(&self) -> ConnectionResult<(Hash, u64)> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().await;
        let hash = state.current_blockhash;
        let last_valid = state.blockhashes.get(&hash).copied().unwrap_or_default();
        Ok((hash, last_valid))
    }

    async fn get_block_height(&self) -> ConnectionResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().await.block_height)
    }

    async fn send_transaction(&self, tx: &Transaction) -> ConnectionResult<Signature> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        self.admit(&state, tx)?;

        let signature = tx.signatures[0];
        if state.holding {
            state.held.push(tx.clone());
            state.statuses.insert(signature, SignatureState::Pending);
        } else {
            let status = self.apply(&mut state, tx);
            state.statuses.insert(signature, status);
        }
        Ok(signature)
    }

    async fn send_and_confirm_transaction(
        &self,
        tx: &Transaction,
    ) -> ConnectionResult<Signature> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let holding = {
            let mut state = self.state.lock().await;
            self.admit(&state, tx)?;
            if state.holding {
                state.held.push(tx.clone());
                true
            } else {
                let status = self.apply(&mut state, tx);
                state.statuses.insert(tx.signatures[0], status.clone());
                if let SignatureState::Failed { error, .. } = status {
                    return Err(ConnectionError::Transaction(error));
                }
                false
            }
        };
        if holding {
            // Never confirms while held; the caller's bound decides
            std::future::pending::<()>().await;
        }
        Ok(tx.signatures[0])
    }

    async fn get_signature_state(&self, signature: &Signature) -> ConnectionResult<SignatureState> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().await;
        Ok(state
            .statuses
            .get(signature)
            .cloned()
            .unwrap_or(SignatureState::Pending))
    }

    async fn get_account(&self, pubkey: &Pubkey) -> ConnectionResult<Option<Account>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().await.accounts.get(pubkey).cloned())
    }

    fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }
}

/// Short bounds so timeout paths finish quickly
pub fn fast_submit_config() -> SubmitConfig {
    SubmitConfig {
        confirmation_timeout: Duration::from_millis(300),
        poll_interval: Duration::from_millis(10),
    }
}

pub async fn setup_cluster() -> (MockCluster, Keypair) {
    let cluster = MockCluster::new();
    let payer = cluster.funded_payer().await;
    (cluster, payer)
}
