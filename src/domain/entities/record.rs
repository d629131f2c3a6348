//! Records returned by the upstream source and forwarding key extraction.

use std::collections::HashMap;

use crate::domain::errors::ForwardingError;

/// One run of formatted text inside a rich-text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextRun {
    pub plain_text: String,
}

impl RichTextRun {
    pub fn new(plain_text: impl Into<String>) -> Self {
        Self {
            plain_text: plain_text.into(),
        }
    }
}

/// Typed value of a record property.
///
/// Only [`FieldValue::RichText`] can carry a forwarding key. Every other kind
/// is kept so that extraction can report what it found instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    RichText(Vec<RichTextRun>),
    Title(Vec<RichTextRun>),
    /// Any property kind the forwarder does not interpret, with its type name.
    Other(String),
}

impl FieldValue {
    /// Upstream type name of this value.
    pub fn kind(&self) -> &str {
        match self {
            Self::RichText(_) => "rich_text",
            Self::Title(_) => "title",
            Self::Other(kind) => kind,
        }
    }
}

/// A single row of an upstream database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    /// Canonical location of the record; this is the redirect destination.
    pub url: String,
    pub properties: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            properties: HashMap::new(),
        }
    }

    /// Adds a property, replacing any previous value under the same name.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Extracts the forwarding key stored in `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardingError::MissingForwardField`] if the record has no
    /// such property and [`ForwardingError::UnsupportedFieldType`] if the
    /// property is not rich text.
    pub fn forwarding_key(&self, field: &str) -> Result<String, ForwardingError> {
        match self.properties.get(field) {
            None => Err(ForwardingError::MissingForwardField {
                field: field.to_string(),
                record: self.id.clone(),
            }),
            Some(FieldValue::RichText(runs)) => Ok(concat_plain_text(runs)),
            Some(other) => Err(ForwardingError::UnsupportedFieldType {
                field: field.to_string(),
                kind: other.kind().to_string(),
            }),
        }
    }
}

/// Joins the plain text of every run, in order, with no separator.
///
/// This is the canonical key normalization: a request key matches a record
/// only if it equals this concatenation exactly.
pub fn concat_plain_text(runs: &[RichTextRun]) -> String {
    runs.iter().map(|run| run.plain_text.as_str()).collect()
}
