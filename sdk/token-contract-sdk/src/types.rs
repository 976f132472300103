use serde::Serialize;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::AccountMeta;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

/// A program-derived address together with the bump that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Ordered account list for one entry-point call.
///
/// The program reads accounts by position, so the order is part of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSet {
    metas: Vec<AccountMeta>,
}

impl AccountSet {
    pub(crate) fn new(metas: Vec<AccountMeta>) -> Self {
        Self { metas }
    }

    pub fn len(&self) -> usize {
        self.metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AccountMeta> {
        self.metas.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountMeta> {
        self.metas.iter()
    }

    /// Addresses that must sign, in account order, without duplicates
    pub fn required_signers(&self) -> Vec<Pubkey> {
        let mut signers: Vec<Pubkey> = Vec::new();
        for meta in self.metas.iter().filter(|m| m.is_signer) {
            if !signers.contains(&meta.pubkey) {
                signers.push(meta.pubkey);
            }
        }
        signers
    }

    pub fn as_metas(&self) -> &[AccountMeta] {
        &self.metas
    }
}

/// Recent blockhash plus the last block height at which it is still accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessToken {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Commitment level at which a signature was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Finality {
    Processed,
    Confirmed,
    Finalized,
}

impl From<CommitmentConfig> for Finality {
    fn from(commitment: CommitmentConfig) -> Self {
        if commitment.is_finalized() {
            Finality::Finalized
        } else if commitment.is_confirmed() {
            Finality::Confirmed
        } else {
            Finality::Processed
        }
    }
}

/// Terminal artifact of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationResult {
    pub signature: Signature,
    pub finality: Finality,
    /// Slot the transaction landed in, when the network reported it
    pub slot: Option<u64>,
}

/// Decoded token state: the mint account plus its metadata account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRecord {
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub decimals: u8,
    pub supply: u64,
    pub mint_authority: Option<Pubkey>,
    pub freeze_authority: Option<Pubkey>,
    pub update_authority: Pubkey,
    pub is_mutable: bool,
}

impl TokenRecord {
    /// Authority recorded by the program for the creator of the token
    pub fn authority(&self) -> Pubkey {
        self.update_authority
    }
}

/// Decoded `ProgramSecurity` account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityRecord {
    pub address: Pubkey,
    pub version: u32,
    pub admin: Pubkey,
    pub security_txt: String,
    pub last_updated: i64,
}
