//! Two-tier forwarding lookup across all configured databases.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::forwarding_index::{ForwardingIndex, IndexState};
use crate::domain::entities::ForwardedDatabase;
use crate::domain::errors::ForwardingError;
use crate::domain::repositories::SourceClient;

/// Snapshot of one index, used by health reporting and the admin CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexStatus {
    pub name: String,
    pub state: IndexState,
    pub entries: usize,
}

/// Owns one [`ForwardingIndex`] per configured database and resolves
/// forwarding keys against them.
///
/// Constructed once at startup and shared with the HTTP layer through
/// [`crate::state::AppState`].
pub struct ForwardingService {
    source: Arc<dyn SourceClient>,
    indexes: Vec<ForwardingIndex>,
}

impl ForwardingService {
    /// Creates a service with an empty index for every database, in the given order.
    pub fn new(source: Arc<dyn SourceClient>, databases: Vec<ForwardedDatabase>) -> Self {
        Self {
            source,
            indexes: databases.into_iter().map(ForwardingIndex::new).collect(),
        }
    }

    /// Resolves `key` in `database` to its destination URLs.
    ///
    /// The cached index is consulted first. On a miss the key is refreshed
    /// from the live source, which also writes the result back to the index.
    ///
    /// # Errors
    ///
    /// - [`ForwardingError::DatabaseNotFound`] if `database` is not configured
    /// - [`ForwardingError::ItemNotFound`] if neither cache nor source has the key
    /// - Record or upstream errors from the live refresh
    pub async fn lookup(&self, database: &str, key: &str) -> Result<Vec<String>, ForwardingError> {
        let index = self.index(database)?;

        if let Some(urls) = index.get(key).await {
            debug!(database, key, "Forwarding found in cache");
            return Ok(urls);
        }

        match index.refresh_key(self.source.as_ref(), key).await {
            Ok(urls) => {
                debug!(database, key, "Forwarding found in source");
                Ok(urls)
            }
            Err(e) => {
                debug!(database, key, error = %e, "Forwarding not found");
                Err(e)
            }
        }
    }

    /// Rebuilds every index from a full scan, in configuration order.
    ///
    /// Stops at the first failure; databases after it are left untouched.
    pub async fn populate_all(&self) -> Result<(), ForwardingError> {
        if self.indexes.is_empty() {
            warn!("No databases to populate");
        }

        for index in &self.indexes {
            let entries = index.rebuild_full(self.source.as_ref()).await?;
            info!(database = %index.database().name, entries, "Populated database");
        }

        Ok(())
    }

    /// Rebuilds a single database from a full scan.
    pub async fn populate(&self, database: &str) -> Result<usize, ForwardingError> {
        let index = self.index(database)?;
        let entries = index.rebuild_full(self.source.as_ref()).await?;
        info!(database, entries, "Populated database");
        Ok(entries)
    }

    /// Returns cached entries of `database`, sorted by key.
    pub async fn entries(&self, database: &str) -> Result<Vec<(String, Vec<String>)>, ForwardingError> {
        Ok(self.index(database)?.entries().await)
    }

    /// Reports the state of every index in configuration order.
    pub async fn status(&self) -> Vec<IndexStatus> {
        let mut statuses = Vec::with_capacity(self.indexes.len());
        for index in &self.indexes {
            statuses.push(IndexStatus {
                name: index.database().name.clone(),
                state: index.state().await,
                entries: index.len().await,
            });
        }
        statuses
    }

    fn index(&self, database: &str) -> Result<&ForwardingIndex, ForwardingError> {
        self.indexes
            .iter()
            .find(|index| index.database().name == database)
            .ok_or_else(|| ForwardingError::DatabaseNotFound(database.to_string()))
    }
}
