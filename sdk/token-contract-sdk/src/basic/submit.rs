use crate::advanced::transaction::SignedTransaction;
use crate::core::connection::{ConnectionError, SignatureState, SolConnection};
use crate::error::{Result, TokenSdkError};
use crate::types::{ConfirmationResult, Finality, FreshnessToken};
use solana_sdk::signature::Signature;
use solana_sdk::transaction::TransactionError;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Bounds for waiting on finality
#[derive(Debug, Clone, Copy)]
pub struct SubmitConfig {
    pub confirmation_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            confirmation_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// How a transaction is handed to the network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStyle {
    /// Submit once, then poll signature status
    #[default]
    FireAndWait,
    /// One client call that retries submission and polling internally
    Atomic,
}

/// Submits signed transactions and reports their terminal state.
///
/// Nothing here re-submits after a timeout: the transaction may still land, so
/// the caller re-queries instead.
pub struct SubmissionClient<'a, C: SolConnection> {
    connection: &'a C,
    config: SubmitConfig,
}

impl<'a, C: SolConnection> SubmissionClient<'a, C> {
    pub fn new(connection: &'a C, config: SubmitConfig) -> Self {
        Self { connection, config }
    }

    pub fn config(&self) -> SubmitConfig {
        self.config
    }

    pub async fn submit(
        &self,
        tx: &SignedTransaction,
        style: SubmitStyle,
    ) -> Result<ConfirmationResult> {
        match style {
            SubmitStyle::FireAndWait => self.submit_and_wait(tx).await,
            SubmitStyle::Atomic => self.submit_atomic(tx).await,
        }
    }

    /// Submit once, then poll until finality, rejection, expiry, or timeout
    #[instrument(skip_all, fields(selector = tx.call().selector(), signature = %tx.signature()))]
    pub async fn submit_and_wait(&self, tx: &SignedTransaction) -> Result<ConfirmationResult> {
        let expected = tx.signature();
        let freshness = tx.freshness();

        let signature = self
            .connection
            .send_transaction(tx.transaction())
            .await
            .map_err(|e| classify(e, Some(expected), freshness))?;

        info!(%signature, "transaction submitted, waiting for confirmation");
        self.wait_for_confirmation(&signature, freshness).await
    }

    /// Poll a submitted signature. Usable on its own to re-query after a timeout.
    pub async fn wait_for_confirmation(
        &self,
        signature: &Signature,
        freshness: FreshnessToken,
    ) -> Result<ConfirmationResult> {
        let start = Instant::now();

        loop {
            match self.connection.get_signature_state(signature).await {
                Ok(SignatureState::Landed { slot, finality }) => {
                    info!(%signature, slot, ?finality, "transaction confirmed");
                    return Ok(ConfirmationResult {
                        signature: *signature,
                        finality,
                        slot: Some(slot),
                    });
                },
                Ok(SignatureState::Failed { slot, error }) => {
                    warn!(%signature, slot, %error, "transaction rejected");
                    return Err(classify(
                        ConnectionError::Transaction(error),
                        Some(*signature),
                        freshness,
                    ));
                },
                Ok(SignatureState::Pending) => {
                    debug!(%signature, "transaction not yet confirmed");
                    if self.blockhash_expired(freshness).await {
                        return Err(TokenSdkError::StaleFreshness {
                            blockhash: freshness.blockhash,
                            reason: format!(
                                "block height passed {} before {} was seen",
                                freshness.last_valid_block_height, signature
                            ),
                        });
                    }
                },
                Err(e) => {
                    warn!(%signature, error = %e, "error checking transaction status");
                },
            }

            let waited = start.elapsed();
            if waited >= self.config.confirmation_timeout {
                warn!(%signature, ?waited, "confirmation timed out");
                return Err(TokenSdkError::ConfirmationTimeout {
                    signature: *signature,
                    waited,
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// Single client call; the client owns retries, this owns the bound
    #[instrument(skip_all, fields(selector = tx.call().selector(), signature = %tx.signature()))]
    pub async fn submit_atomic(&self, tx: &SignedTransaction) -> Result<ConfirmationResult> {
        let expected = tx.signature();
        let freshness = tx.freshness();
        let timeout = self.config.confirmation_timeout;

        let outcome = tokio::time::timeout(
            timeout,
            self.connection.send_and_confirm_transaction(tx.transaction()),
        )
        .await;

        match outcome {
            Ok(Ok(signature)) => {
                // send_and_confirm waits for the connection's own commitment
                let finality = Finality::from(self.connection.commitment());
                info!(%signature, ?finality, "transaction confirmed");
                Ok(ConfirmationResult {
                    signature,
                    finality,
                    slot: None,
                })
            },
            Ok(Err(e)) => Err(classify(e, Some(expected), freshness)),
            Err(_) => {
                warn!(signature = %expected, ?timeout, "confirmation timed out");
                Err(TokenSdkError::ConfirmationTimeout {
                    signature: expected,
                    waited: timeout,
                })
            },
        }
    }

    async fn blockhash_expired(&self, freshness: FreshnessToken) -> bool {
        match self.connection.get_block_height().await {
            Ok(height) => height > freshness.last_valid_block_height,
            Err(e) => {
                debug!(error = %e, "block height unavailable");
                false
            },
        }
    }
}

/// Map a boundary failure onto the SDK taxonomy, keeping the payload intact
fn classify(
    error: ConnectionError,
    signature: Option<Signature>,
    freshness: FreshnessToken,
) -> TokenSdkError {
    match error {
        ConnectionError::Transaction(TransactionError::BlockhashNotFound) => {
            TokenSdkError::StaleFreshness {
                blockhash: freshness.blockhash,
                reason: "blockhash not found".to_string(),
            }
        },
        ConnectionError::Transaction(error) => {
            TokenSdkError::SubmissionRejected { signature, error }
        },
        ConnectionError::Rpc(msg) => TokenSdkError::Connection(msg),
    }
}
