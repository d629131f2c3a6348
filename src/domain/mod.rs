//! Domain layer: entities, source access traits and the error taxonomy.
//!
//! - [`entities`] - Forwarded databases, records and key extraction
//! - [`repositories`] - The [`repositories::SourceClient`] contract
//! - [`errors`] - [`errors::ForwardingError`]
//!
//! Nothing in this layer depends on HTTP or on a concrete upstream.

pub mod entities;
pub mod errors;
pub mod repositories;
