use crate::core::constants::{
    MAX_SEEDS, MAX_SEED_LEN, METADATA_SEED, SECURITY_SEED, TOKEN_ACCOUNT_SEED,
    TOKEN_METADATA_PROGRAM_ID,
};
use crate::error::{Result, TokenSdkError};
use crate::types::DerivedAddress;
use solana_sdk::pubkey::{Pubkey, PubkeyError};

//=============================================================================
// PDA Derivation
//=============================================================================

/// Derive a program address from seed segments.
///
/// Walks the bump from 255 down and returns the first candidate that falls off
/// the ed25519 curve, matching `Pubkey::find_program_address`. The bump is appended
/// as the final seed, so callers may supply at most `MAX_SEEDS - 1` segments.
pub fn derive_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<DerivedAddress> {
    if seeds.len() >= MAX_SEEDS {
        return Err(TokenSdkError::InvalidSeed(format!(
            "{} seed segments given, at most {} allowed",
            seeds.len(),
            MAX_SEEDS - 1
        )));
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(TokenSdkError::InvalidSeed(format!(
            "seed {} is {} bytes, at most {} allowed",
            index,
            seed.len(),
            MAX_SEED_LEN
        )));
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        with_bump.push(&bump_seed);

        match Pubkey::create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok(DerivedAddress { address, bump }),
            // On the curve; try the next bump
            Err(PubkeyError::InvalidSeeds) => continue,
            Err(e) => return Err(TokenSdkError::InvalidSeed(e.to_string())),
        }
    }

    Err(TokenSdkError::InvalidSeed(
        "no viable bump seed found".to_string(),
    ))
}

/// Derive the Metaplex metadata PDA for a mint
pub fn derive_metadata_pda(mint: &Pubkey) -> Result<DerivedAddress> {
    derive_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
}

/// Derive the payer's token account PDA for a mint
pub fn derive_token_account_pda(
    program_id: &Pubkey,
    payer: &Pubkey,
    mint: &Pubkey,
) -> Result<DerivedAddress> {
    derive_address(
        &[TOKEN_ACCOUNT_SEED, payer.as_ref(), mint.as_ref()],
        program_id,
    )
}

/// Derive the program security PDA
pub fn derive_security_pda(program_id: &Pubkey) -> Result<DerivedAddress> {
    derive_address(&[SECURITY_SEED], program_id)
}
