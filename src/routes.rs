//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /`                          - Greeting
//! - `GET /health`                    - Per-database index state
//! - `GET /r/{database_id}/{item_id}` - Forwarding redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, root_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/r", api::routes::forward_routes())
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service: [`router`] with trailing slashes trimmed.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
