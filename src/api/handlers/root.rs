//! Handler for the root path.

/// Liveness greeting.
///
/// # Endpoint
///
/// `GET /`
pub async fn root_handler() -> &'static str {
    "hello"
}
