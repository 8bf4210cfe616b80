use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockline_core::ProductId;

/// One validated restock suggestion.
///
/// This is *not* a ledger mutation. It is advice that higher layers may
/// display or act on; nothing here touches stock levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRestockSuggestion {
    pub product_id: ProductId,
    /// Suggested order quantity, strictly positive.
    pub quantity: i64,
    /// Optional free-form rationale from the oracle.
    pub reason: Option<String>,
}

/// One validated forecast point: predicted demand for a product on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub product_id: ProductId,
    /// Predicted units, never negative.
    pub predicted_quantity: i64,
    /// Confidence in \[0, 1\].
    pub confidence: f64,
}

#[derive(Debug, Error)]
pub enum OracleError {
    /// The oracle answered, but the payload does not match the contract.
    /// Recoverable: callers degrade to an advisory-absent result.
    #[error("oracle contract violation: {0}")]
    ContractViolation(String),

    /// The oracle could not be reached or failed transiently.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

impl OracleError {
    pub fn contract_violation(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
