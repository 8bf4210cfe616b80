use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/sales", post(record_sale))
}

pub async fn record_sale(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::RecordSaleRequest>,
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
        .record_sale(&store_id, &product_id, body.quantity, &actor, now)
    {
        Ok(sale) => (StatusCode::CREATED, Json(dto::sale_to_json(&sale))).into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
