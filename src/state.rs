//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::ForwardingService;

#[derive(Clone)]
pub struct AppState {
    pub forwarding_service: Arc<ForwardingService>,
}

impl AppState {
    pub fn new(forwarding_service: Arc<ForwardingService>) -> Self {
        Self { forwarding_service }
    }
}
