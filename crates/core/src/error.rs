//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Each variant maps to exactly one response code at the HTTP boundary, so
/// callers branch on the kind instead of parsing messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A requested store/product/pair does not exist.
    #[error("not found")]
    NotFound,

    /// The operation would violate an invariant (negative stock,
    /// non-positive price, duplicate provisioning).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The backing store failed transiently; the caller may retry.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// An oracle response failed shape validation. Recoverable: callers fall
    /// back to an advisory-absent result instead of propagating the payload.
    #[error("oracle contract violation: {0}")]
    OracleContractViolation(String),
}

impl LedgerError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    pub fn oracle_contract_violation(msg: impl Into<String>) -> Self {
        Self::OracleContractViolation(msg.into())
    }
}
