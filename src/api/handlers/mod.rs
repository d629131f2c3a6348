//! HTTP request handlers.

pub mod forward;
pub mod health;
pub mod root;

pub use forward::forward_handler;
pub use health::health_handler;
pub use root::root_handler;
