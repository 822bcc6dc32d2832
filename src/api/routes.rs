//! API Routes
//!
//! Configures the Axum routers for the peer protocol and the frontend API.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    api_handler, health_handler, peer_handler, stats_handler, ApiState, AppState,
};

/// Creates the router other nodes talk to.
///
/// # Endpoints
/// - `GET <base_path><group>/<key>` - Raw value bytes
///
/// `base_path` is normalized to end with a single '/'. Requests for the
/// base path itself reach the handler too and are answered with 400.
pub fn create_peer_router(state: AppState, base_path: &str) -> Router {
    let prefix = base_path.trim_end_matches('/');

    let mut router = Router::new()
        .route(&format!("{}/", prefix), get(peer_handler))
        .route(&format!("{}/*path", prefix), get(peer_handler));
    if !prefix.is_empty() {
        router = router.route(prefix, get(peer_handler));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates the client-facing router.
///
/// # Endpoints
/// - `GET /api?key=<key>` - Raw value bytes
/// - `GET /stats` - Per-group statistics
/// - `GET /health` - Health check endpoint
pub fn create_api_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", get(api_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
