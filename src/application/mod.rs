//! Application layer services implementing the forwarding logic.
//!
//! Services consume the [`crate::domain::repositories::SourceClient`] trait and
//! give HTTP handlers and the admin CLI a narrow API.
//!
//! - [`services::ForwardingIndex`] - Cached key to URL mapping for one database
//! - [`services::ForwardingService`] - Cache-then-source lookup across databases

pub mod services;
