// Comemora HTTP API
//
// Library half of the server: configuration, routes and OpenAPI document.
// The binary in main.rs wires these to storage, a notifier and a listener.

pub mod api;
pub mod app;
pub mod config;
pub mod openapi;

pub use api::{AppState, EventService};
pub use app::{build_app, build_router_with_prefix, HealthResponse};
pub use config::{ServerConfig, StorageConfig};
