// src/application/state.rs

use std::sync::Arc;

use crate::config::BatchRules;
use crate::db::ConnectionPool;
use crate::events::EventBus;
use crate::repositories::{BatchRepository, SqliteBatchRepository};
use crate::services::BatchService;

/// Application state shared by every command.
/// All fields are Arc-wrapped for thread-safe sharing across requests.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub batch_service: Arc<BatchService>,
}

impl AppState {
    /// Wire repository, event bus and service over an initialized pool
    pub fn new(pool: Arc<ConnectionPool>, rules: BatchRules) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let batch_repo: Arc<dyn BatchRepository> = Arc::new(SqliteBatchRepository::new(pool));
        let batch_service = Arc::new(BatchService::new(batch_repo, Arc::clone(&event_bus), rules));

        Self {
            event_bus,
            batch_service,
        }
    }
}
