//! Forwarding route configuration.

use crate::api::handlers::forward_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// Forwarding routes, mounted under `/r`.
///
/// # Endpoints
///
/// - `GET /{database_id}/{item_id}` - Redirect to the item's destination(s)
pub fn forward_routes() -> Router<AppState> {
    Router::new().route("/{database_id}/{item_id}", get(forward_handler))
}
