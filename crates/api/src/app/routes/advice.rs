//! Oracle-backed advisory routes.
//!
//! The oracle's answer is untrusted: it passes shape validation before
//! anything downstream sees it, and a malformed payload degrades the response
//! to an empty advisory instead of propagating.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use stockline_oracle::{validate, OracleError};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

const DEFAULT_FORECAST_DAYS: u32 = 7;

pub fn router() -> Router {
    Router::new()
        .route("/restock-advice/:store_id", get(get_restock_advice))
        .route("/forecast/:store_id", get(get_forecast))
}

fn oracle_unavailable(msg: String) -> axum::response::Response {
    errors::json_error(StatusCode::BAD_GATEWAY, "oracle_unavailable", msg)
}

pub async fn get_restock_advice(
    Extension(services): Extension<Arc<AppServices>>,
    Path(store_id): Path<String>,
) -> axum::response::Response {
    let store_id = match common::parse_store_id(&store_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let rows = match services.ledger().read_inventory(&store_id) {
        Ok(rows) => rows,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let snapshot = dto::snapshot_from_rows(&store_id, &rows);
    let payload = match services.oracle().restock_advice(&snapshot).await {
        Ok(p) => p,
        Err(OracleError::Unavailable(msg)) => return oracle_unavailable(msg),
        Err(OracleError::ContractViolation(msg)) => {
            tracing::warn!(store_id = %store_id, "restock advice rejected: {msg}");
            return degraded_advice(&store_id);
        }
    };

    match validate::parse_restock_advice(&payload) {
        Ok(advice) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "store_id": store_id,
                "advice": advice,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(store_id = %store_id, "restock advice rejected: {e}");
            degraded_advice(&store_id)
        }
    }
}

fn degraded_advice(store_id: &stockline_core::StoreId) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "store_id": store_id,
            "advice": [],
            "degraded": true,
        })),
    )
        .into_response()
}

pub async fn get_forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Path(store_id): Path<String>,
    Query(query): Query<dto::ForecastQuery>,
) -> axum::response::Response {
    let store_id = match common::parse_store_id(&store_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let days = query.days.unwrap_or(DEFAULT_FORECAST_DAYS);

    // Mirror the inventory read policy: forecasting an unknown/empty store is
    // a 404, not an empty forecast.
    if let Err(e) = services.ledger().read_inventory(&store_id) {
        return errors::ledger_error_to_response(e);
    }

    let sales = match services.ledger().sales_history(&store_id) {
        Ok(sales) => sales,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    let history = dto::history_from_sales(&store_id, &sales);
    let payload = match services.oracle().demand_forecast(&history, days).await {
        Ok(p) => p,
        Err(OracleError::Unavailable(msg)) => return oracle_unavailable(msg),
        Err(OracleError::ContractViolation(msg)) => {
            tracing::warn!(store_id = %store_id, "forecast rejected: {msg}");
            return degraded_forecast(&store_id, days);
        }
    };

    match validate::parse_forecast(&payload) {
        Ok(points) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "store_id": store_id,
                "horizon_days": days,
                "forecast": points,
            })),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(store_id = %store_id, "forecast rejected: {e}");
            degraded_forecast(&store_id, days)
        }
    }
}

fn degraded_forecast(store_id: &stockline_core::StoreId, days: u32) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "store_id": store_id,
            "horizon_days": days,
            "forecast": [],
            "degraded": true,
        })),
    )
        .into_response()
}
