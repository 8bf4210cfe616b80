use axum::Router;

pub mod advice;
pub mod alerts;
pub mod common;
pub mod inventory;
pub mod products;
pub mod sales;

/// Everything mounted under `/api`.
pub fn api_router() -> Router {
    Router::new()
        .merge(inventory::router())
        .merge(alerts::router())
        .merge(products::router())
        .merge(sales::router())
        .merge(advice::router())
}
