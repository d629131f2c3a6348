//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::{DatabaseHealth, HealthResponse};
use crate::state::AppState;

/// Returns service health with the population state of each database.
///
/// # Endpoint
///
/// `GET /health`
///
/// Always answers 200: an empty index is a valid state under lazy loading.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "databases": [
///     { "name": "tasks", "state": "populated", "entries": 42 }
///   ]
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let databases = state
        .forwarding_service
        .status()
        .await
        .into_iter()
        .map(DatabaseHealth::from)
        .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        databases,
    })
}
