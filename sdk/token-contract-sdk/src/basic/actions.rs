use crate::advanced::accounts::AccountSchemaBuilder;
use crate::advanced::instructions::{self, CreateTokenArgs, EntryPoint, EntryPointCall};
use crate::advanced::transaction::{SignedTransaction, TransactionAssembler, UnsignedTransaction};
use crate::core::connection::SolConnection;
use crate::core::constants::DEFAULT_PROGRAM_ID;
use crate::core::signer::SignerSet;
use crate::error::{Result, TokenSdkError};
use crate::utils;
use solana_sdk::pubkey::Pubkey;

pub struct CreateTokenBuilder {
    program_id: Pubkey,
    payer: Option<Pubkey>,
    mint: Option<Pubkey>,
    args: Option<CreateTokenArgs>,
    deployer: Option<Pubkey>,
    metadata_signer: Option<Pubkey>,
    remaining_accounts: Vec<Pubkey>,
}

impl CreateTokenBuilder {
    pub fn new() -> Self {
        Self {
            program_id: DEFAULT_PROGRAM_ID,
            payer: None,
            mint: None,
            args: None,
            deployer: None,
            metadata_signer: None,
            remaining_accounts: Vec::new(),
        }
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn with_mint(mut self, mint: Pubkey) -> Self {
        self.mint = Some(mint);
        self
    }

    pub fn with_args(mut self, args: CreateTokenArgs) -> Self {
        self.args = Some(args);
        self
    }

    pub fn with_deployer(mut self, deployer: Pubkey) -> Self {
        self.deployer = Some(deployer);
        self
    }

    pub fn with_metadata_signer(mut self, metadata: Pubkey) -> Self {
        self.metadata_signer = Some(metadata);
        self
    }

    pub fn with_remaining_accounts(mut self, accounts: impl IntoIterator<Item = Pubkey>) -> Self {
        self.remaining_accounts.extend(accounts);
        self
    }

    /// Metadata and token account addresses the call will touch
    pub fn get_pdas(&self) -> Result<(Pubkey, Pubkey)> {
        let payer = self.payer.ok_or(TokenSdkError::SchemaMismatch {
            entry_point: EntryPoint::CreateToken.selector(),
            slot: "payer",
        })?;
        let mint = self.mint.ok_or(TokenSdkError::SchemaMismatch {
            entry_point: EntryPoint::CreateToken.selector(),
            slot: "mint",
        })?;
        let metadata = match self.metadata_signer {
            Some(key) => key,
            None => utils::derive_metadata_pda(&mint)?.address,
        };
        let token_account = utils::derive_token_account_pda(&self.program_id, &payer, &mint)?;
        Ok((metadata, token_account.address))
    }

    fn schema(&self) -> AccountSchemaBuilder {
        let mut schema = AccountSchemaBuilder::new(EntryPoint::CreateToken)
            .with_program_id(self.program_id)
            .with_remaining_accounts(self.remaining_accounts.iter().copied());
        if let Some(payer) = self.payer {
            schema = schema.with_payer(payer);
        }
        if let Some(mint) = self.mint {
            schema = schema.with_mint(mint);
        }
        if let Some(deployer) = self.deployer {
            schema = schema.with_deployer(deployer);
        }
        if let Some(metadata) = self.metadata_signer {
            schema = schema.with_metadata_signer(metadata);
        }
        schema
    }

    /// Build the unsigned transaction. No network access.
    pub fn build(&self) -> Result<UnsignedTransaction> {
        let args = self
            .args
            .clone()
            .ok_or_else(|| TokenSdkError::InvalidArguments("create_token args required".into()))?;
        let accounts = self.schema().build()?;
        let payer = accounts
            .get(0)
            .map(|meta| meta.pubkey)
            .ok_or(TokenSdkError::SchemaMismatch {
                entry_point: EntryPoint::CreateToken.selector(),
                slot: "payer",
            })?;
        TransactionAssembler::new(self.program_id).build(args.into_call()?, accounts, &payer)
    }

    pub async fn build_transaction(
        &self,
        connection: &impl SolConnection,
        signers: &SignerSet<'_>,
    ) -> Result<SignedTransaction> {
        self.build()?.sign(signers, connection).await
    }
}

impl Default for CreateTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `initialize_security` and `upgrade_security`
pub struct SecurityBuilder {
    entry_point: EntryPoint,
    program_id: Pubkey,
    payer: Option<Pubkey>,
    authority: Option<Pubkey>,
    new_txt: Option<String>,
}

impl SecurityBuilder {
    pub fn initialize() -> Self {
        Self::new(EntryPoint::InitializeSecurity)
    }

    pub fn upgrade(new_txt: impl Into<String>) -> Self {
        let mut builder = Self::new(EntryPoint::UpgradeSecurity);
        builder.new_txt = Some(new_txt.into());
        builder
    }

    fn new(entry_point: EntryPoint) -> Self {
        Self {
            entry_point,
            program_id: DEFAULT_PROGRAM_ID,
            payer: None,
            authority: None,
            new_txt: None,
        }
    }

    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn with_authority(mut self, authority: Pubkey) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn get_pda(&self) -> Result<Pubkey> {
        Ok(utils::derive_security_pda(&self.program_id)?.address)
    }

    fn call(&self) -> Result<EntryPointCall> {
        match self.entry_point {
            EntryPoint::UpgradeSecurity => {
                instructions::upgrade_security_call(self.new_txt.clone().unwrap_or_default())
            },
            _ => instructions::initialize_security_call(),
        }
    }

    pub fn build(&self) -> Result<UnsignedTransaction> {
        let mut schema = AccountSchemaBuilder::new(self.entry_point).with_program_id(self.program_id);
        if let Some(payer) = self.payer {
            schema = schema.with_payer(payer);
        }
        if let Some(authority) = self.authority {
            schema = schema.with_authority(authority);
        }
        let accounts = schema.build()?;

        // Fee payer falls back to the authority
        let payer = self
            .payer
            .or(self.authority)
            .ok_or(TokenSdkError::SchemaMismatch {
                entry_point: self.entry_point.selector(),
                slot: "payer",
            })?;
        TransactionAssembler::new(self.program_id).build(self.call()?, accounts, &payer)
    }

    pub async fn build_transaction(
        &self,
        connection: &impl SolConnection,
        signers: &SignerSet<'_>,
    ) -> Result<SignedTransaction> {
        self.build()?.sign(signers, connection).await
    }
}
