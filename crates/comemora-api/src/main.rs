// Comemora API server
// Decision: SQLite file storage when DATABASE_URL is unset

use anyhow::{Context, Result};
use comemora_api::{build_app, AppState, ServerConfig, StorageConfig};
use comemora_core::{CancellationToken, CelebrationService, ConsoleNotifier, Notifier};
use comemora_storage::StorageBackend;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "comemora_api=debug,comemora_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("comemora-api starting...");

    let config = ServerConfig::from_env().context("Invalid configuration")?;

    let storage = match &config.storage {
        StorageConfig::Postgres(url) => StorageBackend::postgres(url)
            .await
            .context("Failed to connect to database")?,
        StorageConfig::Sqlite(location) => StorageBackend::sqlite(location)
            .await
            .with_context(|| format!("Failed to open SQLite database {}", location))?,
        StorageConfig::InMemory => {
            tracing::warn!("Running with in-memory storage (dev mode), events are not persisted");
            StorageBackend::in_memory()
        }
    };
    tracing::info!(storage = storage.kind(), "Storage ready");

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier::new());
    let service =
        CelebrationService::new(storage, notifier).with_lookahead_days(config.lookahead_days);
    tracing::info!(
        lookahead_days = service.lookahead_days(),
        "Celebration service ready"
    );

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    if config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
    }

    let shutdown = CancellationToken::new();
    let app = build_app(AppState::new(service, shutdown.clone()), &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;
    tracing::info!("HTTP server listening on {}", config.bind_address);

    let server_shutdown = shutdown.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_shutdown.cancelled().await })
            .await
    });

    tokio::select! {
        result = &mut server => {
            // Server stopped on its own
            result.context("Server task failed")?.context("Server error")?;
            return Ok(());
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for shutdown signal")?;
        }
    }

    tracing::info!("Shutting down server...");
    shutdown.cancel();

    match tokio::time::timeout(config.shutdown_timeout, server).await {
        Ok(result) => {
            result.context("Server task failed")?.context("Server error")?;
            tracing::info!("Server exited");
        }
        Err(_) => {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout.as_secs(),
                "Server forced to shutdown"
            );
        }
    }

    Ok(())
}
