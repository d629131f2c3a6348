//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! - [`notion`] - Notion database client

pub mod notion;
