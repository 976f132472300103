use crate::error::TokenSdkError;
use crate::types::Finality;
use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, TransactionError};
use thiserror::Error;

/// Failure reported across the network boundary
#[derive(Debug, Clone, Error)]
pub enum ConnectionError {
    /// The network or the program rejected the transaction
    #[error("transaction error: {0}")]
    Transaction(TransactionError),

    /// Transport or RPC-level failure
    #[error("rpc error: {0}")]
    Rpc(String),
}

impl From<ConnectionError> for TokenSdkError {
    fn from(e: ConnectionError) -> Self {
        match e {
            ConnectionError::Transaction(error) => TokenSdkError::SubmissionRejected {
                signature: None,
                error,
            },
            ConnectionError::Rpc(msg) => TokenSdkError::Connection(msg),
        }
    }
}

pub type ConnectionResult<T> = std::result::Result<T, ConnectionError>;

/// What the network currently knows about a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureState {
    /// Not seen yet, or not yet at the requested commitment
    Pending,
    Landed { slot: u64, finality: Finality },
    Failed { slot: u64, error: TransactionError },
}

#[async_trait]
pub trait SolConnection: Send + Sync {
    /// Recent blockhash and its last valid block height
    async fn get_latest_blockhash(&self) -> ConnectionResult<(Hash, u64)>;

    async fn get_block_height(&self) -> ConnectionResult<u64>;

    /// Submit once without waiting for confirmation
    async fn send_transaction(&self, tx: &Transaction) -> ConnectionResult<Signature>;

    /// Submit and wait for confirmation inside the client, retrying as it sees fit
    async fn send_and_confirm_transaction(&self, tx: &Transaction)
        -> ConnectionResult<Signature>;

    async fn get_signature_state(&self, signature: &Signature) -> ConnectionResult<SignatureState>;

    async fn get_account(&self, pubkey: &Pubkey) -> ConnectionResult<Option<Account>>;

    /// Commitment a confirmed submission has reached
    fn commitment(&self) -> CommitmentConfig {
        CommitmentConfig::confirmed()
    }
}

/// `SolConnection` over the JSON-RPC nonblocking client
pub struct RpcConnection {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcConnection {
    pub fn new(rpc_url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url.into(), commitment),
            commitment,
        }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }
}

fn map_client_error(e: ClientError) -> ConnectionError {
    match e.get_transaction_error() {
        Some(tx_err) => ConnectionError::Transaction(tx_err),
        None => ConnectionError::Rpc(e.to_string()),
    }
}

#[async_trait]
impl SolConnection for RpcConnection {
    async fn get_latest_blockhash(&self) -> ConnectionResult<(Hash, u64)> {
        self.client
            .get_latest_blockhash_with_commitment(self.commitment)
            .await
            .map_err(map_client_error)
    }

    async fn get_block_height(&self) -> ConnectionResult<u64> {
        self.client
            .get_block_height_with_commitment(self.commitment)
            .await
            .map_err(map_client_error)
    }

    async fn send_transaction(&self, tx: &Transaction) -> ConnectionResult<Signature> {
        self.client
            .send_transaction(tx)
            .await
            .map_err(map_client_error)
    }

    async fn send_and_confirm_transaction(
        &self,
        tx: &Transaction,
    ) -> ConnectionResult<Signature> {
        self.client
            .send_and_confirm_transaction(tx)
            .await
            .map_err(map_client_error)
    }

    async fn get_signature_state(&self, signature: &Signature) -> ConnectionResult<SignatureState> {
        let statuses = self
            .client
            .get_signature_statuses(&[*signature])
            .await
            .map_err(map_client_error)?
            .value;

        let Some(Some(status)) = statuses.into_iter().next() else {
            return Ok(SignatureState::Pending);
        };

        if let Some(error) = status.err.clone() {
            return Ok(SignatureState::Failed {
                slot: status.slot,
                error,
            });
        }

        let finality = if status.satisfies_commitment(CommitmentConfig::finalized()) {
            Finality::Finalized
        } else if status.satisfies_commitment(CommitmentConfig::confirmed()) {
            Finality::Confirmed
        } else {
            Finality::Processed
        };

        if status.satisfies_commitment(self.commitment) {
            Ok(SignatureState::Landed {
                slot: status.slot,
                finality,
            })
        } else {
            Ok(SignatureState::Pending)
        }
    }

    async fn get_account(&self, pubkey: &Pubkey) -> ConnectionResult<Option<Account>> {
        self.client
            .get_account_with_commitment(pubkey, self.commitment)
            .await
            .map(|response| response.value)
            .map_err(map_client_error)
    }

    fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }
}
