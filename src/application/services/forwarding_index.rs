//! In-memory forwarding index for a single logical database.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::ForwardedDatabase;
use crate::domain::errors::ForwardingError;
use crate::domain::repositories::{FieldFilter, SourceClient};

/// Page size used when draining a whole database.
pub const FULL_SCAN_PAGE_SIZE: u32 = 5;

/// Page size used for targeted refresh queries.
pub const FILTERED_SCAN_PAGE_SIZE: u32 = 100;

type Mapping = HashMap<String, Vec<String>>;

/// Population state of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// Nothing has been loaded yet.
    Empty,
    /// At least one rebuild or targeted refresh has succeeded.
    Populated,
}

impl IndexState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Populated => "populated",
        }
    }
}

/// Forwarding key to destination URL mapping for one [`ForwardedDatabase`].
///
/// URL lists keep upstream scan order, and records sharing a key are
/// concatenated without deduplication.
///
/// # Concurrency
///
/// Upstream queries run without holding the lock. Their complete result is
/// applied under a single write, so readers only ever see a mapping from
/// before or after an update, never one in progress. Two overlapping updates
/// resolve as last writer wins.
pub struct ForwardingIndex {
    database: ForwardedDatabase,
    mapping: RwLock<Option<Mapping>>,
}

impl ForwardingIndex {
    /// Creates an empty index.
    pub fn new(database: ForwardedDatabase) -> Self {
        Self {
            database,
            mapping: RwLock::new(None),
        }
    }

    pub fn database(&self) -> &ForwardedDatabase {
        &self.database
    }

    pub async fn state(&self) -> IndexState {
        match *self.mapping.read().await {
            Some(_) => IndexState::Populated,
            None => IndexState::Empty,
        }
    }

    /// Number of distinct forwarding keys currently cached.
    pub async fn len(&self) -> usize {
        self.mapping.read().await.as_ref().map_or(0, HashMap::len)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns the cached URLs for `key`, without touching the source.
    pub async fn get(&self, key: &str) -> Option<Vec<String>> {
        self.mapping
            .read()
            .await
            .as_ref()
            .and_then(|mapping| mapping.get(key).cloned())
    }

    /// Returns every cached entry sorted by key.
    pub async fn entries(&self) -> Vec<(String, Vec<String>)> {
        let guard = self.mapping.read().await;
        let mut entries: Vec<_> = guard
            .iter()
            .flat_map(|mapping| mapping.iter())
            .map(|(key, urls)| (key.clone(), urls.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Replaces the whole mapping with a fresh scan of the database.
    ///
    /// Returns the number of keys loaded.
    ///
    /// # Errors
    ///
    /// Fails with [`ForwardingError::MissingForwardField`] or
    /// [`ForwardingError::UnsupportedFieldType`] on a malformed record and
    /// with [`ForwardingError::SourceUnavailable`] on upstream failure. On
    /// error the previous mapping stays in place.
    pub async fn rebuild_full(&self, source: &dyn SourceClient) -> Result<usize, ForwardingError> {
        let fresh = self.scan(source, None, FULL_SCAN_PAGE_SIZE).await?;
        let keys = fresh.len();

        *self.mapping.write().await = Some(fresh);

        Ok(keys)
    }

    /// Reloads the entries for `key` with a filtered query.
    ///
    /// Every key produced by the query replaces its cached entry; unrelated
    /// keys are kept. Returns the URLs now stored for `key`.
    ///
    /// # Errors
    ///
    /// Fails with [`ForwardingError::ItemNotFound`] when the query matches
    /// nothing, otherwise with the same errors as [`Self::rebuild_full`].
    pub async fn refresh_key(
        &self,
        source: &dyn SourceClient,
        key: &str,
    ) -> Result<Vec<String>, ForwardingError> {
        let filter = FieldFilter::equals(&self.database.forward_field, key);
        let matched = self
            .scan(source, Some(filter), FILTERED_SCAN_PAGE_SIZE)
            .await?;

        if matched.is_empty() {
            return Err(self.item_not_found(key));
        }

        let urls = matched.get(key).cloned();

        let mut guard = self.mapping.write().await;
        guard.get_or_insert_with(HashMap::new).extend(matched);
        drop(guard);

        // The upstream filter can match records whose concatenated key differs
        // from the requested one.
        urls.ok_or_else(|| self.item_not_found(key))
    }

    /// Drains the source page by page into a new mapping.
    async fn scan(
        &self,
        source: &dyn SourceClient,
        filter: Option<FieldFilter>,
        page_size: u32,
    ) -> Result<Mapping, ForwardingError> {
        let mut mapping = Mapping::new();
        let mut cursor = None;
        let mut pages = 0usize;

        loop {
            let page = source
                .query_page(&self.database.database_id, filter.clone(), page_size, cursor)
                .await?;
            pages += 1;

            for record in &page.records {
                let key = record.forwarding_key(&self.database.forward_field)?;
                mapping.entry(key).or_default().push(record.url.clone());
            }

            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(
            database = %self.database.name,
            filtered = filter.is_some(),
            pages,
            keys = mapping.len(),
            "Scanned upstream database"
        );

        Ok(mapping)
    }

    fn item_not_found(&self, key: &str) -> ForwardingError {
        ForwardingError::ItemNotFound {
            database: self.database.name.clone(),
            key: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{FieldValue, Record, RichTextRun};
    use crate::domain::repositories::{MockSourceClient, RecordPage, SourceError};
    use mockall::Sequence;

    fn tasks() -> ForwardedDatabase {
        ForwardedDatabase::new("tasks", "db-1", "slug")
    }

    fn record(id: &str, slug: &str) -> Record {
        Record::new(id, format!("https://notion.so/{id}"))
            .with_field("slug", FieldValue::RichText(vec![RichTextRun::new(slug)]))
    }

    fn page(records: Vec<Record>, next: Option<&str>) -> RecordPage {
        RecordPage {
            records,
            next_cursor: next.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_rebuild_full_follows_cursors_in_order() {
        let mut source = MockSourceClient::new();
        let mut seq = Sequence::new();

        source
            .expect_query_page()
            .withf(|id, filter, size, cursor| {
                id == "db-1" && filter.is_none() && *size == FULL_SCAN_PAGE_SIZE && cursor.is_none()
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(page(vec![record("p1", "abc"), record("p2", "xyz")], Some("c1"))));
        source
            .expect_query_page()
            .withf(|_, _, _, cursor| cursor.as_deref() == Some("c1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(page(vec![record("p3", "abc")], None)));

        let index = ForwardingIndex::new(tasks());
        assert_eq!(index.state().await, IndexState::Empty);

        let keys = index.rebuild_full(&source).await.unwrap();

        assert_eq!(keys, 2);
        assert_eq!(index.state().await, IndexState::Populated);
        assert_eq!(
            index.get("abc").await.unwrap(),
            vec!["https://notion.so/p1", "https://notion.so/p3"]
        );
        assert_eq!(index.get("xyz").await.unwrap(), vec!["https://notion.so/p2"]);
    }

    #[tokio::test]
    async fn test_rebuild_full_is_idempotent() {
        let mut source = MockSourceClient::new();
        source
            .expect_query_page()
            .times(2)
            .returning(|_, _, _, _| Ok(page(vec![record("p1", "abc"), record("p2", "abc")], None)));

        let index = ForwardingIndex::new(tasks());
        index.rebuild_full(&source).await.unwrap();
        let first = index.entries().await;
        index.rebuild_full(&source).await.unwrap();

        assert_eq!(index.entries().await, first);
    }

    #[tokio::test]
    async fn test_rebuild_full_drops_removed_keys() {
        let mut source = MockSourceClient::new();
        let mut seq = Sequence::new();
        source
            .expect_query_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(page(vec![record("p1", "old")], None)));
        source
            .expect_query_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(page(vec![record("p2", "new")], None)));

        let index = ForwardingIndex::new(tasks());
        index.rebuild_full(&source).await.unwrap();
        index.rebuild_full(&source).await.unwrap();

        assert!(index.get("old").await.is_none());
        assert!(index.get("new").await.is_some());
    }

    #[tokio::test]
    async fn test_rebuild_full_failure_keeps_previous_mapping() {
        let mut source = MockSourceClient::new();
        let mut seq = Sequence::new();
        source
            .expect_query_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(page(vec![record("p1", "abc")], None)));
        source
            .expect_query_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(page(vec![Record::new("p2", "https://notion.so/p2")], None)));

        let index = ForwardingIndex::new(tasks());
        index.rebuild_full(&source).await.unwrap();

        let err = index.rebuild_full(&source).await.unwrap_err();

        assert!(matches!(err, ForwardingError::MissingForwardField { .. }));
        assert_eq!(index.get("abc").await.unwrap(), vec!["https://notion.so/p1"]);
    }

    #[tokio::test]
    async fn test_rebuild_full_propagates_source_error() {
        let mut source = MockSourceClient::new();
        source
            .expect_query_page()
            .times(1)
            .returning(|_, _, _, _| Err(SourceError::Unavailable("rate limited".to_string())));

        let index = ForwardingIndex::new(tasks());
        let err = index.rebuild_full(&source).await.unwrap_err();

        assert!(matches!(err, ForwardingError::SourceUnavailable(_)));
        assert_eq!(index.state().await, IndexState::Empty);
    }

    #[tokio::test]
    async fn test_refresh_key_uses_filtered_query_and_keeps_other_keys() {
        let mut source = MockSourceClient::new();
        let mut seq = Sequence::new();
        source
            .expect_query_page()
            .withf(|_, filter, _, _| filter.is_none())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(page(vec![record("p1", "abc")], None)));
        source
            .expect_query_page()
            .withf(|_, filter, size, _| {
                *filter == Some(FieldFilter::equals("slug", "new")) && *size == FILTERED_SCAN_PAGE_SIZE
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(page(vec![record("p2", "new"), record("p3", "new")], None)));

        let index = ForwardingIndex::new(tasks());
        index.rebuild_full(&source).await.unwrap();

        let urls = index.refresh_key(&source, "new").await.unwrap();

        assert_eq!(urls, vec!["https://notion.so/p2", "https://notion.so/p3"]);
        assert_eq!(index.get("abc").await.unwrap(), vec!["https://notion.so/p1"]);
        assert_eq!(index.len().await, 2);
    }

    #[tokio::test]
    async fn test_refresh_key_replaces_stale_entry() {
        let mut source = MockSourceClient::new();
        let mut seq = Sequence::new();
        source
            .expect_query_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(page(vec![record("p1", "abc")], None)));
        source
            .expect_query_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(page(vec![record("p1", "abc"), record("p2", "abc")], None)));

        let index = ForwardingIndex::new(tasks());
        index.refresh_key(&source, "abc").await.unwrap();
        let urls = index.refresh_key(&source, "abc").await.unwrap();

        assert_eq!(urls, vec!["https://notion.so/p1", "https://notion.so/p2"]);
        assert_eq!(index.get("abc").await.unwrap(), urls);
    }

    #[tokio::test]
    async fn test_refresh_key_no_match() {
        let mut source = MockSourceClient::new();
        source
            .expect_query_page()
            .times(1)
            .returning(|_, _, _, _| Ok(RecordPage::default()));

        let index = ForwardingIndex::new(tasks());
        let err = index.refresh_key(&source, "missing").await.unwrap_err();

        assert!(matches!(err, ForwardingError::ItemNotFound { ref key, .. } if key == "missing"));
        assert_eq!(index.state().await, IndexState::Empty);
    }

    #[tokio::test]
    async fn test_refresh_key_match_with_different_concatenation() {
        let mut source = MockSourceClient::new();
        source
            .expect_query_page()
            .times(1)
            .returning(|_, _, _, _| Ok(page(vec![record("p1", "ABC")], None)));

        let index = ForwardingIndex::new(tasks());
        let err = index.refresh_key(&source, "abc").await.unwrap_err();

        assert!(matches!(err, ForwardingError::ItemNotFound { .. }));
        assert_eq!(index.get("ABC").await.unwrap(), vec!["https://notion.so/p1"]);
    }

    #[tokio::test]
    async fn test_refresh_key_unsupported_field_type() {
        let mut source = MockSourceClient::new();
        source.expect_query_page().times(1).returning(|_, _, _, _| {
            Ok(page(
                vec![Record::new("p1", "https://notion.so/p1")
                    .with_field("slug", FieldValue::Other("number".to_string()))],
                None,
            ))
        });

        let index = ForwardingIndex::new(tasks());
        let err = index.refresh_key(&source, "abc").await.unwrap_err();

        assert!(matches!(err, ForwardingError::UnsupportedFieldType { .. }));
    }
}
