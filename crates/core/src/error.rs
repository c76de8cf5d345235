//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Domain-level error.
///
/// Every variant is an expected, caller-recoverable condition. The `Display`
/// strings double as the messages returned to HTTP clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// An account with the same tax identifier already exists.
    #[error("Customer already exists")]
    DuplicateAccount,

    /// The tax identifier is blank or cannot be carried in a request header.
    #[error("Invalid tax id")]
    InvalidTaxId,

    /// No account is registered under the given tax identifier.
    #[error("Customer not found")]
    AccountNotFound,

    /// The balance does not cover the requested withdrawal.
    #[error("Insufficient funds!")]
    InsufficientFunds,
}

impl LedgerError {
    /// Short machine-readable code, used in structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::DuplicateAccount => "duplicate_account",
            LedgerError::InvalidTaxId => "invalid_tax_id",
            LedgerError::AccountNotFound => "account_not_found",
            LedgerError::InsufficientFunds => "insufficient_funds",
        }
    }
}
