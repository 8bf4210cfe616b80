use std::sync::Arc;

use chrono::Utc;

use stockline_api::app::{build_app, AppServices};
use stockline_core::ActorId;

#[tokio::main]
async fn main() {
    stockline_observability::init();

    let services = Arc::new(AppServices::in_memory());

    let seed = std::env::var("STOCKLINE_SEED")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if seed {
        let actor = ActorId::new("seed").expect("static actor id");
        if let Err(e) = stockline_infra::seed::load_demo(services.ledger(), &actor, Utc::now()) {
            tracing::warn!("demo seed failed: {e}");
        }
    }

    let addr = std::env::var("STOCKLINE_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
