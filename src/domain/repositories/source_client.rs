//! Trait for reading records from the upstream document database.

use async_trait::async_trait;

use crate::domain::entities::Record;

/// Failure talking to the upstream source.
///
/// Transport, authentication and rate-limit failures are not distinguished.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("upstream source unavailable: {0}")]
    Unavailable(String),
}

/// Exact-equality filter on a named text property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    pub field: String,
    pub equals: String,
}

impl FieldFilter {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            equals: value.into(),
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPage {
    pub records: Vec<Record>,
    /// Cursor for the next page; `None` once the result set is exhausted.
    pub next_cursor: Option<String>,
}

/// Paginated read access to an upstream database.
///
/// A full scan is a sequence of unfiltered calls that follow `next_cursor`
/// until it is `None`; a filtered scan does the same with a [`FieldFilter`].
/// Implementations keep no local state between calls.
///
/// # Implementations
///
/// - [`crate::infrastructure::notion::NotionClient`] - Notion REST API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetches one page of records from `database_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] on any upstream failure.
    async fn query_page(
        &self,
        database_id: &str,
        filter: Option<FieldFilter>,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<RecordPage, SourceError>;
}
