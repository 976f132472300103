use crate::types::AccountSet;
use crate::error::{Result, TokenSdkError};
use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

/// Entry points exposed by the token contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    CreateToken,
    InitializeSecurity,
    UpgradeSecurity,
}

/// Type tag of a positional argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Str,
    U8,
    U64,
    Bool,
}

const CREATE_TOKEN_ARGS: &[ArgKind] = &[
    ArgKind::Str,  // name
    ArgKind::Str,  // symbol
    ArgKind::U8,   // decimals
    ArgKind::Str,  // uri
    ArgKind::U64,  // initial_supply
    ArgKind::Bool, // revoke_mint
    ArgKind::Bool, // revoke_freeze
    ArgKind::Bool, // revoke_update
];

impl EntryPoint {
    pub fn selector(self) -> &'static str {
        match self {
            Self::CreateToken => "create_token",
            Self::InitializeSecurity => "initialize_security",
            Self::UpgradeSecurity => "upgrade_security",
        }
    }

    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "create_token" => Some(Self::CreateToken),
            "initialize_security" => Some(Self::InitializeSecurity),
            "upgrade_security" => Some(Self::UpgradeSecurity),
            _ => None,
        }
    }

    /// Full positional argument list, longest accepted layout
    pub fn arg_kinds(self) -> &'static [ArgKind] {
        match self {
            Self::CreateToken => CREATE_TOKEN_ARGS,
            Self::InitializeSecurity => &[],
            Self::UpgradeSecurity => &[ArgKind::Str],
        }
    }

    /// Argument counts the deployed program versions have accepted
    pub fn accepted_arities(self) -> &'static [usize] {
        match self {
            Self::CreateToken => &[3, 4, 5, 8],
            Self::InitializeSecurity => &[0],
            Self::UpgradeSecurity => &[1],
        }
    }

    /// Anchor instruction discriminator: `sha256("global:<selector>")[..8]`
    pub fn discriminator(self) -> [u8; 8] {
        let digest = Sha256::digest(format!("global:{}", self.selector()).as_bytes());
        let mut out = [0u8; 8];
        out.copy_from_slice(&digest[..8]);
        out
    }
}

/// A single typed argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Str(String),
    U8(u8),
    U64(u64),
    Bool(bool),
}

impl ArgValue {
    pub fn kind(&self) -> ArgKind {
        match self {
            Self::Str(_) => ArgKind::Str,
            Self::U8(_) => ArgKind::U8,
            Self::U64(_) => ArgKind::U64,
            Self::Bool(_) => ArgKind::Bool,
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Str(v) => v.serialize(out)?,
            Self::U8(v) => v.serialize(out)?,
            Self::U64(v) => v.serialize(out)?,
            Self::Bool(v) => v.serialize(out)?,
        }
        Ok(())
    }
}

/// Selector plus ordered arguments. Checked against the entry point's layout on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPointCall {
    entry_point: EntryPoint,
    args: Vec<ArgValue>,
}

impl EntryPointCall {
    pub fn new(entry_point: EntryPoint, args: Vec<ArgValue>) -> Result<Self> {
        if !entry_point.accepted_arities().contains(&args.len()) {
            return Err(TokenSdkError::InvalidArguments(format!(
                "{} takes {:?} arguments, got {}",
                entry_point.selector(),
                entry_point.accepted_arities(),
                args.len()
            )));
        }
        for (position, (arg, expected)) in args.iter().zip(entry_point.arg_kinds()).enumerate() {
            if arg.kind() != *expected {
                return Err(TokenSdkError::InvalidArguments(format!(
                    "{} argument {} must be {:?}, got {:?}",
                    entry_point.selector(),
                    position,
                    expected,
                    arg.kind()
                )));
            }
        }
        Ok(Self { entry_point, args })
    }

    pub fn entry_point(&self) -> EntryPoint {
        self.entry_point
    }

    pub fn selector(&self) -> &'static str {
        self.entry_point.selector()
    }

    pub fn args(&self) -> &[ArgValue] {
        &self.args
    }

    /// Discriminator followed by the Borsh encoding of each argument
    pub fn data(&self) -> Result<Vec<u8>> {
        let mut data = self.entry_point.discriminator().to_vec();
        for arg in &self.args {
            arg.write_to(&mut data)?;
        }
        Ok(data)
    }

    pub fn to_instruction(&self, program_id: &Pubkey, accounts: &AccountSet) -> Result<Instruction> {
        Ok(Instruction {
            program_id: *program_id,
            accounts: accounts.as_metas().to_vec(),
            data: self.data()?,
        })
    }
}

/// Authority revocations applied after minting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevokeFlags {
    pub mint: bool,
    pub freeze: bool,
    pub update: bool,
}

/// `create_token` arguments. Trailing fields are optional and omitted from the
/// encoding when absent; a field may only be set if every earlier one is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTokenArgs {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub uri: Option<String>,
    pub initial_supply: Option<u64>,
    pub revoke: Option<RevokeFlags>,
}

impl CreateTokenArgs {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            uri: None,
            initial_supply: None,
            revoke: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_initial_supply(mut self, supply: u64) -> Self {
        self.initial_supply = Some(supply);
        self
    }

    pub fn with_revoke(mut self, revoke: RevokeFlags) -> Self {
        self.revoke = Some(revoke);
        self
    }

    pub fn into_call(self) -> Result<EntryPointCall> {
        if self.initial_supply.is_some() && self.uri.is_none() {
            return Err(TokenSdkError::InvalidArguments(
                "initial_supply requires uri".to_string(),
            ));
        }
        if self.revoke.is_some() && self.initial_supply.is_none() {
            return Err(TokenSdkError::InvalidArguments(
                "revoke flags require initial_supply".to_string(),
            ));
        }

        let mut args = vec![
            ArgValue::Str(self.name),
            ArgValue::Str(self.symbol),
            ArgValue::U8(self.decimals),
        ];
        if let Some(uri) = self.uri {
            args.push(ArgValue::Str(uri));
        }
        if let Some(supply) = self.initial_supply {
            args.push(ArgValue::U64(supply));
        }
        if let Some(revoke) = self.revoke {
            args.push(ArgValue::Bool(revoke.mint));
            args.push(ArgValue::Bool(revoke.freeze));
            args.push(ArgValue::Bool(revoke.update));
        }
        EntryPointCall::new(EntryPoint::CreateToken, args)
    }
}

pub fn initialize_security_call() -> Result<EntryPointCall> {
    EntryPointCall::new(EntryPoint::InitializeSecurity, vec![])
}

pub fn upgrade_security_call(new_txt: impl Into<String>) -> Result<EntryPointCall> {
    EntryPointCall::new(
        EntryPoint::UpgradeSecurity,
        vec![ArgValue::Str(new_txt.into())],
    )
}
