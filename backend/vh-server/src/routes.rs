use crate::{AppState, lifecycle, status, worlds};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Lifecycle (serialized by the coordinator)
        .route("/start", post(lifecycle::start))
        .route("/stop", post(lifecycle::stop))
        .route("/backup", get(lifecycle::backup))
        .route("/update", post(lifecycle::update))
        // Read-only
        .route("/worlds", get(worlds::list_worlds))
        .route("/status", get(status::status))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
