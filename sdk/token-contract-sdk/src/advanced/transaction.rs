use crate::advanced::instructions::EntryPointCall;
use crate::core::connection::SolConnection;
use crate::core::constants::PACKET_DATA_SIZE;
use crate::core::signer::SignerSet;
use crate::error::{Result, TokenSdkError};
use crate::types::{AccountSet, FreshnessToken};
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tracing::{debug, info};

/// Builds transactions for one program
#[derive(Debug, Clone, Copy)]
pub struct TransactionAssembler {
    program_id: Pubkey,
}

impl TransactionAssembler {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Build the unsigned body. Purely local.
    pub fn build(
        &self,
        call: EntryPointCall,
        accounts: AccountSet,
        payer: &Pubkey,
    ) -> Result<UnsignedTransaction> {
        let ix = call.to_instruction(&self.program_id, &accounts)?;
        let message = Message::new(&[ix], Some(payer));

        // Signature bytes are fixed-size, so the placeholder size is the final size
        let size = wire_size(&Transaction::new_unsigned(message.clone()))?;
        if size > PACKET_DATA_SIZE {
            return Err(TokenSdkError::TransactionTooLarge(size));
        }

        debug!(
            selector = call.selector(),
            accounts = accounts.len(),
            size,
            "built unsigned transaction"
        );

        Ok(UnsignedTransaction {
            call,
            accounts,
            payer: *payer,
            message,
        })
    }
}

/// `Built` state: message assembled, no freshness token, no signatures
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    call: EntryPointCall,
    accounts: AccountSet,
    payer: Pubkey,
    message: Message,
}

impl UnsignedTransaction {
    pub fn call(&self) -> &EntryPointCall {
        &self.call
    }

    pub fn accounts(&self) -> &AccountSet {
        &self.accounts
    }

    pub fn payer(&self) -> Pubkey {
        self.payer
    }

    /// Keys the message requires signatures from, fee payer first
    pub fn required_signers(&self) -> &[Pubkey] {
        let count = self.message.header.num_required_signatures as usize;
        &self.message.account_keys[..count]
    }

    /// Every required signer must be present before anything touches the network.
    pub fn check_signers(&self, signers: &SignerSet<'_>) -> Result<()> {
        signers.check_covers(&self.accounts)?;
        match self
            .required_signers()
            .iter()
            .find(|key| !signers.contains(key))
        {
            Some(missing) => Err(TokenSdkError::MissingSigner(*missing)),
            None => Ok(()),
        }
    }

    /// Check signers, fetch a fresh blockhash, then sign
    pub async fn sign(
        self,
        signers: &SignerSet<'_>,
        connection: &impl SolConnection,
    ) -> Result<SignedTransaction> {
        self.check_signers(signers)?;

        let (blockhash, last_valid_block_height) = connection.get_latest_blockhash().await?;
        self.sign_with_token(
            signers,
            FreshnessToken {
                blockhash,
                last_valid_block_height,
            },
        )
    }

    /// Sign against a caller-supplied freshness token
    pub fn sign_with_token(
        self,
        signers: &SignerSet<'_>,
        freshness: FreshnessToken,
    ) -> Result<SignedTransaction> {
        self.check_signers(signers)?;

        let keypairs = signers.select(self.required_signers());
        let mut transaction = Transaction::new_unsigned(self.message);
        transaction
            .try_sign(&keypairs, freshness.blockhash)
            .map_err(|e| TokenSdkError::Signing(e.to_string()))?;

        info!(
            selector = self.call.selector(),
            signature = %transaction.signatures[0],
            blockhash = %freshness.blockhash,
            "signed transaction"
        );

        Ok(SignedTransaction {
            call: self.call,
            accounts: self.accounts,
            transaction,
            freshness,
        })
    }
}

/// `Signed` state: every required signature attached against one freshness token
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    call: EntryPointCall,
    accounts: AccountSet,
    transaction: Transaction,
    freshness: FreshnessToken,
}

impl SignedTransaction {
    pub fn call(&self) -> &EntryPointCall {
        &self.call
    }

    pub fn accounts(&self) -> &AccountSet {
        &self.accounts
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn freshness(&self) -> FreshnessToken {
        self.freshness
    }

    /// Transaction id: the fee payer's signature
    pub fn signature(&self) -> Signature {
        self.transaction.signatures[0]
    }

    /// Signatures paired with the key that produced them
    pub fn signatures(&self) -> Vec<(Pubkey, Signature)> {
        self.transaction
            .message
            .account_keys
            .iter()
            .copied()
            .zip(self.transaction.signatures.iter().copied())
            .collect()
    }

    /// Wire encoding submitted to the network
    pub fn wire_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(&self.transaction)
            .map_err(encoding_error)
    }
}

fn wire_size(transaction: &Transaction) -> Result<usize> {
    bincode::serialized_size(transaction)
        .map(|size| size as usize)
        .map_err(encoding_error)
}

fn encoding_error(e: bincode::Error) -> TokenSdkError {
    TokenSdkError::Encoding(format!("serialize transaction: {e}"))
}
