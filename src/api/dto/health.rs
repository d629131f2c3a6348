//! DTOs for the health check endpoint.

use serde::Serialize;

use crate::application::services::IndexStatus;

/// Service health with one entry per forwarded database.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub databases: Vec<DatabaseHealth>,
}

/// Population state of a single forwarded database.
#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub name: String,
    /// `empty` or `populated`.
    pub state: &'static str,
    pub entries: usize,
}

impl From<IndexStatus> for DatabaseHealth {
    fn from(status: IndexStatus) -> Self {
        Self {
            name: status.name,
            state: status.state.as_str(),
            entries: status.entries,
        }
    }
}
