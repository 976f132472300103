use solana_sdk::hash::Hash;
use solana_sdk::instruction::InstructionError;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::TransactionError;
use std::time::Duration;
use thiserror::Error;

/// Custom error codes returned by the token contract.
///
/// Anchor numbers custom program errors from 6000 in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ProgramErrorCode {
    Unauthorized = 6000,
    InsufficientFunds = 6001,
    AlreadyInitialized = 6002,
    /// Reserved validation code for a decimals value above `MAX_DECIMALS`.
    InvalidDecimals = 6003,
}

impl ProgramErrorCode {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            6000 => Some(Self::Unauthorized),
            6001 => Some(Self::InsufficientFunds),
            6002 => Some(Self::AlreadyInitialized),
            6003 => Some(Self::InvalidDecimals),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

/// SDK-specific error types for token contract operations
#[derive(Debug, Error)]
pub enum TokenSdkError {
    /// Seed segments cannot produce a program-derived address
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// A named account required by the entry point was not supplied
    #[error("Account schema mismatch for {entry_point}: missing `{slot}`")]
    SchemaMismatch {
        entry_point: &'static str,
        slot: &'static str,
    },

    /// An account marked as signer has no matching signing identity
    #[error("Missing signer: {0}")]
    MissingSigner(Pubkey),

    /// Entry-point arguments do not form an accepted layout
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Serialized transaction does not fit a single packet
    #[error("Transaction too large: {0} bytes")]
    TransactionTooLarge(usize),

    /// Signing failed locally
    #[error("Signing error: {0}")]
    Signing(String),

    /// The freshness token (recent blockhash) was unknown or expired on the network
    #[error("Stale blockhash {blockhash}: {reason}")]
    StaleFreshness { blockhash: Hash, reason: String },

    /// The network or the program declined the transaction
    #[error("Submission rejected: {error}")]
    SubmissionRejected {
        signature: Option<Signature>,
        error: TransactionError,
    },

    /// Finality was not observed within the configured bound
    #[error("Transaction {signature} not confirmed within {waited:?}")]
    ConfirmationTimeout {
        signature: Signature,
        waited: Duration,
    },

    /// Account not found on-chain
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Invalid account data or deserialization error
    #[error("Invalid account data: {0}")]
    InvalidAccountData(String),

    /// Connection or RPC error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Borsh serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] std::io::Error),

    /// Wire encoding of a transaction failed
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl TokenSdkError {
    /// Errors raised before any network round-trip.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::InvalidSeed(_)
                | Self::SchemaMismatch { .. }
                | Self::MissingSigner(_)
                | Self::InvalidArguments(_)
                | Self::TransactionTooLarge(_)
                | Self::Signing(_)
                | Self::Encoding(_)
                | Self::Config(_)
        )
    }

    /// Errors a caller may act on by retrying. A timeout calls for a re-query,
    /// a stale blockhash for a rebuild; neither is retried by the SDK itself.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConfirmationTimeout { .. } | Self::StaleFreshness { .. } | Self::Connection(_)
        )
    }

    /// Numeric custom code carried by a rejected submission.
    pub fn rejection_code(&self) -> Option<u32> {
        match self {
            Self::SubmissionRejected {
                error: TransactionError::InstructionError(_, InstructionError::Custom(code)),
                ..
            } => Some(*code),
            _ => None,
        }
    }

    /// Index of the failing instruction in a rejected submission.
    pub fn rejected_instruction(&self) -> Option<u8> {
        match self {
            Self::SubmissionRejected {
                error: TransactionError::InstructionError(index, _),
                ..
            } => Some(*index),
            _ => None,
        }
    }

    pub fn program_error(&self) -> Option<ProgramErrorCode> {
        self.rejection_code().and_then(ProgramErrorCode::from_code)
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, TokenSdkError>;
