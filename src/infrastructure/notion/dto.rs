//! Wire types of the Notion database query endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{FieldValue, Record, RichTextRun};
use crate::domain::repositories::{FieldFilter, RecordPage};

/// Body of `POST /v1/databases/{id}/query`.
#[derive(Debug, Serialize)]
pub struct QueryRequest {
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<PropertyFilter>,
}

/// Property filter, restricted to rich-text equality.
#[derive(Debug, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    pub rich_text: TextCondition,
}

#[derive(Debug, Serialize)]
pub struct TextCondition {
    pub equals: String,
}

impl From<FieldFilter> for PropertyFilter {
    fn from(filter: FieldFilter) -> Self {
        Self {
            property: filter.field,
            rich_text: TextCondition {
                equals: filter.equals,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<NotionPage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotionPage {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub properties: HashMap<String, NotionProperty>,
}

/// A page property.
///
/// Notion stores the value under a key named after the property type, so
/// only the two text-shaped keys are read here.
#[derive(Debug, Deserialize)]
pub struct NotionProperty {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub rich_text: Vec<NotionRichText>,
    #[serde(default)]
    pub title: Vec<NotionRichText>,
}

#[derive(Debug, Deserialize)]
pub struct NotionRichText {
    #[serde(default)]
    pub plain_text: String,
}

/// Error envelope returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct NotionErrorBody {
    pub code: String,
    pub message: String,
}

fn runs(texts: Vec<NotionRichText>) -> Vec<RichTextRun> {
    texts
        .into_iter()
        .map(|t| RichTextRun::new(t.plain_text))
        .collect()
}

impl From<NotionProperty> for FieldValue {
    fn from(property: NotionProperty) -> Self {
        match property.kind.as_str() {
            "rich_text" => FieldValue::RichText(runs(property.rich_text)),
            "title" => FieldValue::Title(runs(property.title)),
            _ => FieldValue::Other(property.kind),
        }
    }
}

impl From<NotionPage> for Record {
    fn from(page: NotionPage) -> Self {
        Record {
            id: page.id,
            url: page.url,
            properties: page
                .properties
                .into_iter()
                .map(|(name, property)| (name, property.into()))
                .collect(),
        }
    }
}

impl From<QueryResponse> for RecordPage {
    fn from(response: QueryResponse) -> Self {
        RecordPage {
            records: response.results.into_iter().map(Record::from).collect(),
            next_cursor: if response.has_more {
                response.next_cursor
            } else {
                None
            },
        }
    }
}
