//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over the carpool ledger
//! - Shared in-memory state with background persistence
//! - JSON error responses

pub mod response;
pub mod routes;
pub mod state;

use std::path::Path;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Creates the application router, serving `static_dir` for unmatched paths.
pub fn create_router_with_static(state: AppState, static_dir: &Path) -> Router {
    create_router(state).fallback_service(ServeDir::new(static_dir))
}
