use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::errors;
use crate::app::routes::common;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/inventory-alerts/:store_id", get(get_inventory_alerts))
}

/// An empty alert list is a 200, not a 404 — "nothing to reorder" is a valid
/// answer for any store, known or not.
pub async fn get_inventory_alerts(
    Extension(services): Extension<Arc<AppServices>>,
    Path(store_id): Path<String>,
) -> axum::response::Response {
    let store_id = match common::parse_store_id(&store_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger().alerts(&store_id) {
        Ok(alerts) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "store_id": store_id,
                "alerts": alerts,
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
