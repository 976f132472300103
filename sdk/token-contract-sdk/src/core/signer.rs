use crate::error::{Result, TokenSdkError};
use crate::types::AccountSet;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;

/// The identities available to sign one transaction.
///
/// The payer is always first; it is the fee payer and an implicit required signer.
/// Extra signers (e.g. a freshly generated mint keypair) follow in insertion order.
pub struct SignerSet<'a> {
    signers: Vec<&'a dyn Signer>,
}

impl<'a> SignerSet<'a> {
    pub fn new(payer: &'a dyn Signer) -> Self {
        Self {
            signers: vec![payer],
        }
    }

    pub fn with(mut self, signer: &'a dyn Signer) -> Self {
        if !self.contains(&signer.pubkey()) {
            self.signers.push(signer);
        }
        self
    }

    pub fn payer(&self) -> Pubkey {
        self.signers[0].pubkey()
    }

    pub fn contains(&self, pubkey: &Pubkey) -> bool {
        self.signers.iter().any(|s| s.pubkey() == *pubkey)
    }

    pub fn pubkeys(&self) -> Vec<Pubkey> {
        self.signers.iter().map(|s| s.pubkey()).collect()
    }

    /// Fails on the first required signer that has no identity in this set
    pub fn check_covers(&self, accounts: &AccountSet) -> Result<()> {
        match accounts
            .required_signers()
            .into_iter()
            .find(|key| !self.contains(key))
        {
            Some(missing) => Err(TokenSdkError::MissingSigner(missing)),
            None => Ok(()),
        }
    }

    /// Signers needed by the message, in the order given
    pub(crate) fn select(&self, required: &[Pubkey]) -> Vec<&'a dyn Signer> {
        required
            .iter()
            .filter_map(|key| self.signers.iter().find(|s| s.pubkey() == *key).copied())
            .collect()
    }
}
