//! Handler for forwarding redirects.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Message returned when a lookup succeeds with no URLs.
pub const NO_FORWARDING_MESSAGE: &str = "No forwarding found";

/// Forwards an item key to its destination.
///
/// # Endpoint
///
/// `GET /r/{database_id}/{item_id}`
///
/// # Response Codes
///
/// - **302 Found**: exactly one destination, sent in `Location`
/// - **300 Multiple Choices**: several destinations, as a JSON array of URLs
/// - **404 Not Found**: unknown database, unknown item, or no destination
/// - **500 Internal Server Error**: upstream or record error, with its message
pub async fn forward_handler(
    Path((database_id, item_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    debug!(%database_id, %item_id, "Forwarding item");

    let urls = state
        .forwarding_service
        .lookup(&database_id, &item_id)
        .await?;

    match urls.len() {
        0 => Err(AppError::not_found(NO_FORWARDING_MESSAGE)),
        1 => Ok((StatusCode::FOUND, [(header::LOCATION, urls[0].clone())]).into_response()),
        _ => Ok((StatusCode::MULTIPLE_CHOICES, Json(urls)).into_response()),
    }
}
