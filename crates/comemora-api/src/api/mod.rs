// HTTP API routes
//
// This module contains all HTTP route handlers for the public API.
// Each submodule handles one resource and exposes a `routes` function;
// all of them share the AppState below.

pub mod common;
pub mod events;
pub mod notifications;
pub mod validation;

// Re-export common types
pub use common::{ErrorResponse, ListResponse};

use comemora_core::{CancellationToken, CelebrationService, Notifier};
use comemora_storage::StorageBackend;
use std::sync::Arc;

/// Service type served over HTTP
pub type EventService = CelebrationService<StorageBackend, Arc<dyn Notifier>>;

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
    /// Fired when the server starts shutting down
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(service: EventService, shutdown: CancellationToken) -> Self {
        Self {
            service: Arc::new(service),
            shutdown,
        }
    }

    /// Token for one request, cancelled together with the server
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}
