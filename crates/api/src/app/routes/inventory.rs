use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use stockline_inventory::StockRecord;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/inventory/:store_id", get(get_store_inventory))
        .route("/inventory/update", post(update_inventory))
        .route("/inventory", post(create_stock_record))
}

pub async fn get_store_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Path(store_id): Path<String>,
) -> axum::response::Response {
    let store_id = match common::parse_store_id(&store_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.ledger().read_inventory(&store_id) {
        Ok(rows) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "store_id": store_id,
                "inventory": rows.iter().map(dto::inventory_row_to_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn update_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::InventoryUpdateRequest>,
) -> axum::response::Response {
    let actor = match common::actor_from_headers(&headers) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let store_id = match common::parse_store_id(&body.store_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_id = match common::parse_product_id(&body.product_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let now = Utc::now();

    match services
        .ledger()
        .apply_delta(&store_id, &product_id, body.quantity, &actor, now)
    {
        Ok(level) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "store_id": store_id,
                "product_id": product_id,
                "new_stock_level": level,
                "updated_by": actor,
                "updated_at": now.to_rfc3339(),
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn create_stock_record(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::CreateStockRecordRequest>,
) -> axum::response::Response {
    let actor = match common::actor_from_headers(&headers) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let store_id = match common::parse_store_id(&body.store_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let product_id = match common::parse_product_id(&body.product_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let now = Utc::now();

    let record = match StockRecord::new(
        store_id,
        product_id,
        body.stock_level,
        body.min_threshold,
        &actor,
        now,
    ) {
        Ok(r) => r,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match services.ledger().provision_stock(record) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "store_id": body.store_id,
                "product_id": body.product_id,
                "stock_level": body.stock_level,
                "min_threshold": body.min_threshold,
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
