//! Notion-backed [`SourceClient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};
use url::Url;

use super::dto::{NotionErrorBody, QueryRequest, QueryResponse};
use crate::domain::repositories::{FieldFilter, RecordPage, SourceClient, SourceError};

/// API version pinned in every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com";

/// Client for the Notion database query endpoint.
///
/// Authenticates with an integration token. Every request is bounded by the
/// timeout given at construction; nothing is retried.
pub struct NotionClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl NotionClient {
    /// Builds a client.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] if `base_url` is not a valid URL
    /// or the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        integration_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| SourceError::Unavailable(format!("Invalid Notion base URL: {}", e)))?;

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("Failed to build HTTP client: {}", e)))?;

        info!("Notion client targeting {}", base_url);

        Ok(Self {
            http,
            base_url,
            token: integration_token.into(),
        })
    }

    fn query_url(&self, database_id: &str) -> Result<Url, SourceError> {
        self.base_url
            .join(&format!("v1/databases/{}/query", database_id))
            .map_err(|e| SourceError::Unavailable(format!("Invalid database id: {}", e)))
    }
}

/// Turns a non-2xx response body into a readable message.
fn describe_failure(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<NotionErrorBody>(body) {
        Ok(error) => format!("Notion returned {} ({}): {}", status, error.code, error.message),
        Err(_) => format!("Notion returned {}: {}", status, body),
    }
}

#[async_trait]
impl SourceClient for NotionClient {
    async fn query_page(
        &self,
        database_id: &str,
        filter: Option<FieldFilter>,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<RecordPage, SourceError> {
        let url = self.query_url(database_id)?;
        let body = QueryRequest {
            page_size,
            start_cursor: cursor,
            filter: filter.map(Into::into),
        };

        debug!(database_id, page_size, "Querying Notion database");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(format!("Notion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SourceError::Unavailable(describe_failure(status, &text)));
        }

        let parsed: QueryResponse = response.json().await.map_err(|e| {
            SourceError::Unavailable(format!("Invalid Notion response body: {}", e))
        })?;

        Ok(parsed.into())
    }
}
