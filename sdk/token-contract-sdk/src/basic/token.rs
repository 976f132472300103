use crate::advanced::instructions::CreateTokenArgs;
use crate::basic::actions::{CreateTokenBuilder, SecurityBuilder};
use crate::basic::submit::{SubmissionClient, SubmitConfig, SubmitStyle};
use crate::core::connection::SolConnection;
use crate::core::constants::DEFAULT_PROGRAM_ID;
use crate::core::signer::SignerSet;
use crate::error::Result;
use crate::reader::{self, TokenAccountState};
use crate::types::{ConfirmationResult, SecurityRecord, TokenRecord};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;
use tracing::info;

/// Addresses and confirmation of a created token
#[derive(Debug, Clone)]
pub struct CreatedToken {
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub token_account: Pubkey,
    pub confirmation: ConfirmationResult,
}

/// The token contract as seen from one connection.
///
/// Runs the whole pipeline: schema, assembly, signing, submission. Reads go
/// through `reader` and are only meaningful after a confirmation.
pub struct TokenProgram<'a, C: SolConnection> {
    connection: &'a C,
    program_id: Pubkey,
    submit_config: SubmitConfig,
    style: SubmitStyle,
}

impl<'a, C: SolConnection> TokenProgram<'a, C> {
    pub fn new(connection: &'a C) -> Self {
        Self {
            connection,
            program_id: DEFAULT_PROGRAM_ID,
            submit_config: SubmitConfig::default(),
            style: SubmitStyle::default(),
        }
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_submit_config(mut self, config: SubmitConfig) -> Self {
        self.submit_config = config;
        self
    }

    pub fn with_style(mut self, style: SubmitStyle) -> Self {
        self.style = style;
        self
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn submitter(&self) -> SubmissionClient<'a, C> {
        SubmissionClient::new(self.connection, self.submit_config)
    }

    /// Start a `create_token` call against this program
    pub fn create(&self) -> CreateTokenBuilder {
        CreateTokenBuilder::new().with_program_id(self.program_id)
    }

    /// Create a token with a freshly generated mint identity.
    ///
    /// `deployer` receives the creation fee and must sign; the program only
    /// accepts its configured fee recipient in that slot.
    pub async fn create_token(
        &self,
        payer: &dyn Signer,
        deployer: &dyn Signer,
        mint: &dyn Signer,
        args: CreateTokenArgs,
    ) -> Result<CreatedToken> {
        let builder = self
            .create()
            .with_payer(payer.pubkey())
            .with_deployer(deployer.pubkey())
            .with_mint(mint.pubkey())
            .with_args(args);
        let (metadata, token_account) = builder.get_pdas()?;

        let signers = SignerSet::new(payer).with(deployer).with(mint);
        let tx = builder.build_transaction(self.connection, &signers).await?;
        let confirmation = self.submitter().submit(&tx, self.style).await?;

        info!(
            mint = %mint.pubkey(),
            signature = %confirmation.signature,
            "token created"
        );

        Ok(CreatedToken {
            mint: mint.pubkey(),
            metadata,
            token_account,
            confirmation,
        })
    }

    pub async fn initialize_security(&self, authority: &dyn Signer) -> Result<ConfirmationResult> {
        let signers = SignerSet::new(authority);
        let tx = SecurityBuilder::initialize()
            .with_program_id(self.program_id)
            .with_authority(authority.pubkey())
            .build_transaction(self.connection, &signers)
            .await?;
        self.submitter().submit(&tx, self.style).await
    }

    pub async fn upgrade_security(
        &self,
        authority: &dyn Signer,
        new_txt: impl Into<String>,
    ) -> Result<ConfirmationResult> {
        let signers = SignerSet::new(authority);
        let tx = SecurityBuilder::upgrade(new_txt)
            .with_program_id(self.program_id)
            .with_authority(authority.pubkey())
            .build_transaction(self.connection, &signers)
            .await?;
        self.submitter().submit(&tx, self.style).await
    }

    /// Token whose metadata sits at the Metaplex PDA of `mint`
    pub async fn fetch_token(&self, mint: &Pubkey) -> Result<TokenRecord> {
        reader::fetch_token_record(self.connection, mint, None).await
    }

    /// Token as created, reading metadata from wherever it was placed
    pub async fn fetch_created(&self, created: &CreatedToken) -> Result<TokenRecord> {
        reader::fetch_token_record(self.connection, &created.mint, Some(created.metadata)).await
    }

    /// Token account the program opened for `owner` when creating `mint`
    pub async fn fetch_token_account(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<TokenAccountState> {
        reader::fetch_token_account(self.connection, &self.program_id, owner, mint).await
    }

    pub async fn fetch_security(&self) -> Result<SecurityRecord> {
        reader::fetch_security_record(self.connection, &self.program_id).await
    }
}
