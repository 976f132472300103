pub mod advanced;
pub mod basic;
pub mod config;
pub mod core;
pub mod error;
pub mod keyfile;
pub mod reader;
pub mod types;
pub mod utils;

pub use crate::basic::actions::{CreateTokenBuilder, SecurityBuilder};
pub use crate::basic::submit::{SubmissionClient, SubmitConfig, SubmitStyle};
pub use crate::basic::token::{CreatedToken, TokenProgram};
pub use crate::config::ClientConfig;
pub use crate::core::connection::{RpcConnection, SignatureState, SolConnection};
pub use crate::core::signer::SignerSet;
pub use crate::error::{ProgramErrorCode, Result, TokenSdkError};
pub use crate::types::{
    AccountSet, ConfirmationResult, DerivedAddress, Finality, FreshnessToken, SecurityRecord,
    TokenRecord,
};
pub use crate::utils::{
    derive_address, derive_metadata_pda, derive_security_pda, derive_token_account_pda,
};
pub use crate::reader::{
    fetch_security_record, fetch_token_account, fetch_token_record, TokenExpectation,
};
