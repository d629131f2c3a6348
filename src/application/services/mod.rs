//! Business logic services for the application layer.

pub mod forwarding_index;
pub mod forwarding_service;

pub use forwarding_index::{ForwardingIndex, IndexState};
pub use forwarding_service::{ForwardingService, IndexStatus};
