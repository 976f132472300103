pub mod accounts;
pub mod instructions;
pub mod transaction;
