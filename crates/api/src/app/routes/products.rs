use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use stockline_core::SupplierId;
use stockline_inventory::Product;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/products", post(create_product))
        .route("/update-price", post(update_price))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let actor = match common::actor_from_headers(&headers) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let product_id = match common::parse_product_id(&body.id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let supplier_id = match SupplierId::new(body.supplier_id.as_str()) {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };
    let now = Utc::now();

    let product = match Product::new(
        product_id.clone(),
        body.name,
        body.category,
        body.price,
        supplier_id,
        &actor,
        now,
    ) {
        Ok(p) => p,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match services.ledger().provision_product(product) {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "id": product_id,
                "created_by": actor,
                "created_at": now.to_rfc3339(),
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn update_price(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::PriceUpdateRequest>,
) -> axum::response::Response {
    let actor = match common::actor_from_headers(&headers) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let product_id = match common::parse_product_id(&body.product_id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let now = Utc::now();

    match services
        .ledger()
        .update_price(&product_id, body.new_price, &actor, now)
    {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "store_id": body.store_id,
                "product_id": product_id,
                "new_price": body.new_price,
                "updated_by": actor,
                "updated_at": now.to_rfc3339(),
            })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
