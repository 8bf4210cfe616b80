use std::sync::Arc;

use axum::{extract::Extension, Router};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Assemble the full application router.
pub fn build_app(services: Arc<AppServices>) -> Router {
    Router::new()
        .nest("/api", routes::api_router())
        .layer(Extension(services))
}
