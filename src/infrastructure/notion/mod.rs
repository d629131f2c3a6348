//! Notion REST API integration.
//!
//! [`NotionClient`] implements [`crate::domain::repositories::SourceClient`]
//! on top of `POST /v1/databases/{id}/query`.

mod client;
mod dto;

pub use client::{DEFAULT_BASE_URL, NOTION_VERSION, NotionClient};
