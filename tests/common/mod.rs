#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use notion_forwarder::prelude::*;

/// In-memory upstream with per-database rows, cursor pagination and call counting.
#[derive(Default)]
pub struct FakeSource {
    rows: Mutex<Vec<(String, Record)>>,
    calls: AtomicUsize,
    failing: AtomicBool,
    loose_filter: AtomicBool,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn insert(&self, database_id: &str, record: Record) {
        self.rows
            .lock()
            .unwrap()
            .push((database_id.to_string(), record));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes filtered queries return every row of the database, the way an
    /// upstream does when it matches on something other than the stored key.
    pub fn set_loose_filter(&self, loose: bool) {
        self.loose_filter.store(loose, Ordering::SeqCst);
    }
}

fn matches(record: &Record, filter: &FieldFilter) -> bool {
    match record.properties.get(&filter.field) {
        Some(FieldValue::RichText(runs)) => {
            runs.iter().map(|r| r.plain_text.as_str()).collect::<String>() == filter.equals
        }
        _ => false,
    }
}

#[async_trait]
impl SourceClient for FakeSource {
    async fn query_page(
        &self,
        database_id: &str,
        filter: Option<FieldFilter>,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<RecordPage, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("Notion returned 503".to_string()));
        }

        let loose = self.loose_filter.load(Ordering::SeqCst);
        let selected: Vec<Record> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(db, _)| db == database_id)
            .map(|(_, record)| record)
            .filter(|record| loose || filter.as_ref().is_none_or(|f| matches(record, f)))
            .cloned()
            .collect();

        let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let end = (start + page_size as usize).min(selected.len());

        Ok(RecordPage {
            records: selected[start..end].to_vec(),
            next_cursor: (end < selected.len()).then(|| end.to_string()),
        })
    }
}

pub fn slug_record(id: &str, slug: &str) -> Record {
    Record::new(id, format!("https://notion.so/{id}"))
        .with_field("slug", FieldValue::RichText(vec![RichTextRun::new(slug)]))
}

pub fn tasks_database() -> ForwardedDatabase {
    ForwardedDatabase::new("tasks", "db-tasks", "slug")
}

pub fn create_test_state(source: Arc<FakeSource>) -> AppState {
    let service = ForwardingService::new(source, vec![tasks_database()]);
    AppState::new(Arc::new(service))
}
