//! HTTP request handlers

pub mod health;
pub mod strings;

use std::sync::Arc;

use crate::service::StringService;
use crate::store::StringStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StringService>,
}

impl AppState {
    /// Wraps an already-connected store
    pub fn new(store: Arc<dyn StringStore>) -> Self {
        Self {
            service: Arc::new(StringService::new(store)),
        }
    }
}
