//! Error taxonomy of the forwarding core.

use crate::domain::repositories::SourceError;

/// Errors produced by forwarding lookups and index maintenance.
///
/// Nothing here is retried internally; the HTTP layer is the only place that
/// translates these into status codes.
#[derive(Debug, thiserror::Error)]
pub enum ForwardingError {
    #[error("database '{0}' is not configured")]
    DatabaseNotFound(String),

    #[error("item '{key}' not found in database '{database}'")]
    ItemNotFound { database: String, key: String },

    #[error("forwarding property '{field}' not found on record {record}")]
    MissingForwardField { field: String, record: String },

    #[error("forwarding property '{field}' has type '{kind}', expected rich_text")]
    UnsupportedFieldType { field: String, kind: String },

    #[error(transparent)]
    SourceUnavailable(#[from] SourceError),
}

impl ForwardingError {
    /// Returns true for errors caused by the caller asking for something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DatabaseNotFound(_) | Self::ItemNotFound { .. })
    }
}
