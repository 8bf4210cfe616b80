use axum::http::{HeaderMap, StatusCode};

use stockline_core::{ActorId, ProductId, StoreId};

use crate::app::errors;

/// Every mutation names its acting user explicitly via the `x-actor` header;
/// there is no ambient "current user".
pub fn actor_from_headers(headers: &HeaderMap) -> Result<ActorId, axum::response::Response> {
    let raw = headers
        .get("x-actor")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    ActorId::new(raw).map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_actor",
            "x-actor header is required for mutations",
        )
    })
}

pub fn parse_store_id(raw: &str) -> Result<StoreId, axum::response::Response> {
    StoreId::new(raw).map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "store id cannot be blank")
    })
}

pub fn parse_product_id(raw: &str) -> Result<ProductId, axum::response::Response> {
    ProductId::new(raw).map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "product id cannot be blank")
    })
}
