//! HTTP layer translating requests into forwarding lookups.
//!
//! # Modules
//!
//! - [`dto`] - Response serialization types
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
