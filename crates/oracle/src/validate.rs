//! Shape validation of untrusted oracle payloads.
//!
//! The oracle returns raw JSON. Nothing downstream may consume it before it
//! has passed through these functions: each entry is checked field by field
//! and the whole payload is rejected on the first violation. Extra fields are
//! tolerated; content is never reinterpreted.

use chrono::NaiveDate;
use serde_json::Value;

use stockline_core::ProductId;

use crate::result::{ForecastPoint, OracleError, ProductRestockSuggestion};

/// Validate a restock-advice payload.
///
/// Contract: a JSON array of objects, each with a non-empty `product_id`
/// string and an integer `quantity` > 0; `reason` is an optional string.
pub fn parse_restock_advice(
    payload: &Value,
) -> Result<Vec<ProductRestockSuggestion>, OracleError> {
    let entries = payload.as_array().ok_or_else(|| {
        OracleError::contract_violation("restock advice payload must be a JSON array")
    })?;

    let mut suggestions = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let product_id = required_product_id(entry, idx)?;

        let quantity = entry
            .get("quantity")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                OracleError::contract_violation(format!(
                    "entry {idx}: missing or non-integer 'quantity'"
                ))
            })?;
        if quantity <= 0 {
            return Err(OracleError::contract_violation(format!(
                "entry {idx}: 'quantity' must be positive (got {quantity})"
            )));
        }

        let reason = match entry.get("reason") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(OracleError::contract_violation(format!(
                    "entry {idx}: 'reason' must be a string when present"
                )));
            }
        };

        suggestions.push(ProductRestockSuggestion {
            product_id,
            quantity,
            reason,
        });
    }

    Ok(suggestions)
}

/// Validate a demand-forecast payload.
///
/// Contract: a JSON array of objects, each with an ISO-8601 `date`, a
/// non-empty `product_id` string, an integer `predicted_quantity` >= 0, and a
/// `confidence` number in \[0, 1\].
pub fn parse_forecast(payload: &Value) -> Result<Vec<ForecastPoint>, OracleError> {
    let entries = payload.as_array().ok_or_else(|| {
        OracleError::contract_violation("forecast payload must be a JSON array")
    })?;

    let mut points = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let date_str = entry.get("date").and_then(Value::as_str).ok_or_else(|| {
            OracleError::contract_violation(format!("entry {idx}: missing 'date' string"))
        })?;
        let date: NaiveDate = date_str.parse().map_err(|e| {
            OracleError::contract_violation(format!("entry {idx}: unparseable 'date': {e}"))
        })?;

        let product_id = required_product_id(entry, idx)?;

        let predicted_quantity = entry
            .get("predicted_quantity")
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                OracleError::contract_violation(format!(
                    "entry {idx}: missing or non-integer 'predicted_quantity'"
                ))
            })?;
        if predicted_quantity < 0 {
            return Err(OracleError::contract_violation(format!(
                "entry {idx}: 'predicted_quantity' cannot be negative (got {predicted_quantity})"
            )));
        }

        let confidence = entry
            .get("confidence")
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                OracleError::contract_violation(format!(
                    "entry {idx}: missing or non-numeric 'confidence'"
                ))
            })?;
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(OracleError::contract_violation(format!(
                "entry {idx}: 'confidence' must be in [0, 1] (got {confidence})"
            )));
        }

        points.push(ForecastPoint {
            date,
            product_id,
            predicted_quantity,
            confidence,
        });
    }

    Ok(points)
}

fn required_product_id(entry: &Value, idx: usize) -> Result<ProductId, OracleError> {
    let raw = entry
        .get("product_id")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            OracleError::contract_violation(format!("entry {idx}: missing 'product_id' string"))
        })?;
    ProductId::new(raw).map_err(|_| {
        OracleError::contract_violation(format!("entry {idx}: 'product_id' cannot be blank"))
    })
}
