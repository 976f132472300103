use crate::advanced::instructions::EntryPoint;
use crate::core::constants::{DEFAULT_PROGRAM_ID, DEPLOYER_PUBKEY, TOKEN_METADATA_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::error::{Result, TokenSdkError};
use crate::types::AccountSet;
use crate::utils;
use solana_sdk::instruction::AccountMeta;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_program, sysvar};

/// Where the metadata account address comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetadataSource {
    /// Metaplex PDA of the mint
    Derived,
    /// Freshly generated keypair that signs the transaction
    Signer(Pubkey),
}

/// Assembles the positional account list for one entry point.
///
/// Layouts:
/// - `create_token`: [payer, deployer, mint, metadata, token_account, rent,
///   sysvar_instructions, system_program, token_metadata_program, token_program, ...remaining]
/// - `initialize_security`: [security, authority, system_program, ...remaining]
/// - `upgrade_security`: [security, authority, ...remaining]
///
/// Remaining accounts are appended read-only and non-signer.
#[derive(Debug, Clone)]
pub struct AccountSchemaBuilder {
    entry_point: EntryPoint,
    program_id: Pubkey,
    payer: Option<Pubkey>,
    mint: Option<Pubkey>,
    authority: Option<Pubkey>,
    deployer: Pubkey,
    metadata: MetadataSource,
    remaining: Vec<Pubkey>,
}

impl AccountSchemaBuilder {
    pub fn new(entry_point: EntryPoint) -> Self {
        Self {
            entry_point,
            program_id: DEFAULT_PROGRAM_ID,
            payer: None,
            mint: None,
            authority: None,
            deployer: DEPLOYER_PUBKEY,
            metadata: MetadataSource::Derived,
            remaining: Vec::new(),
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

    /// Security authority. Defaults to the payer.
    pub fn with_authority(mut self, authority: Pubkey) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Fee recipient. It signs `create_token` alongside the payer and the mint.
    pub fn with_deployer(mut self, deployer: Pubkey) -> Self {
        self.deployer = deployer;
        self
    }

    /// Use a signer-generated metadata account instead of the derived one
    pub fn with_metadata_signer(mut self, metadata: Pubkey) -> Self {
        self.metadata = MetadataSource::Signer(metadata);
        self
    }

    pub fn with_remaining_accounts(mut self, accounts: impl IntoIterator<Item = Pubkey>) -> Self {
        self.remaining.extend(accounts);
        self
    }

    pub fn entry_point(&self) -> EntryPoint {
        self.entry_point
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    fn required(&self, value: Option<Pubkey>, slot: &'static str) -> Result<Pubkey> {
        value.ok_or(TokenSdkError::SchemaMismatch {
            entry_point: self.entry_point.selector(),
            slot,
        })
    }

    pub fn build(&self) -> Result<AccountSet> {
        let mut metas = match self.entry_point {
            EntryPoint::CreateToken => self.create_token_head()?,
            EntryPoint::InitializeSecurity => {
                let (security, authority) = self.security_head()?;
                vec![
                    AccountMeta::new(security, false),
                    AccountMeta::new(authority, true),
                    AccountMeta::new_readonly(system_program::id(), false),
                ]
            },
            EntryPoint::UpgradeSecurity => {
                let (security, authority) = self.security_head()?;
                vec![
                    AccountMeta::new(security, false),
                    AccountMeta::new(authority, true),
                ]
            },
        };

        metas.extend(
            self.remaining
                .iter()
                .map(|key| AccountMeta::new_readonly(*key, false)),
        );

        Ok(AccountSet::new(metas))
    }

    fn create_token_head(&self) -> Result<Vec<AccountMeta>> {
        let payer = self.required(self.payer, "payer")?;
        let mint = self.required(self.mint, "mint")?;

        let metadata = match self.metadata {
            MetadataSource::Derived => {
                AccountMeta::new(utils::derive_metadata_pda(&mint)?.address, false)
            },
            MetadataSource::Signer(key) => AccountMeta::new(key, true),
        };
        let token_account = utils::derive_token_account_pda(&self.program_id, &payer, &mint)?;

        Ok(vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(self.deployer, true),
            AccountMeta::new(mint, true),
            metadata,
            AccountMeta::new(token_account.address, false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
            AccountMeta::new_readonly(sysvar::instructions::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ])
    }

    fn security_head(&self) -> Result<(Pubkey, Pubkey)> {
        let authority = self.required(self.authority.or(self.payer), "authority")?;
        let security = utils::derive_security_pda(&self.program_id)?;
        Ok((security.address, authority))
    }
}
