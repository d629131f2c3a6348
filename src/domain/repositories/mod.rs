//! Data access traits for the domain layer.
//!
//! Implementations live in `crate::infrastructure`; mocks are generated with
//! `mockall` for unit tests.

pub mod source_client;

pub use source_client::{FieldFilter, RecordPage, SourceClient, SourceError};

#[cfg(test)]
pub use source_client::MockSourceClient;
