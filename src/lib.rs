//! # Notion Forwarder
//!
//! A redirect service that maps short keys to Notion pages, built with Axum.
//!
//! `GET /r/{database}/{key}` looks the key up in an in-memory index built from
//! a Notion database and redirects to the matching page, or lists every match
//! when there are several.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, the source client trait and errors
//! - **Application Layer** ([`application`]) - Forwarding index and lookup service
//! - **Infrastructure Layer** ([`infrastructure`]) - Notion API client
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs and middleware
//!
//! ## Lookup
//!
//! 1. The database's cached index is checked for the key
//! 2. On a miss, Notion is queried for records whose forward column equals the key
//! 3. The result is written back to the index and returned
//!
//! ## Quick Start
//!
//! ```bash
//! cp config.example.json config.json   # fill in token and databases
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Loaded from a JSON file via [`config::load`]. See [`config`] for all keys.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;
pub mod telemetry;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ForwardingService, IndexState, IndexStatus};
    pub use crate::domain::entities::{FieldValue, ForwardedDatabase, Record, RichTextRun};
    pub use crate::domain::errors::ForwardingError;
    pub use crate::domain::repositories::{FieldFilter, RecordPage, SourceClient, SourceError};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
