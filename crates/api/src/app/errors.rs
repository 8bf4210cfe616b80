use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockline_core::LedgerError;

/// Deterministic error-to-status mapping: each taxonomy kind lands on exactly
/// one code.
pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        LedgerError::InvalidOperation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_operation", msg)
        }
        LedgerError::StorageUnavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", msg)
        }
        LedgerError::OracleContractViolation(msg) => {
            json_error(StatusCode::BAD_GATEWAY, "oracle_contract_violation", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
