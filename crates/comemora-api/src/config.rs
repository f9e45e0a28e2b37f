// Server configuration
//
// Loaded from environment variables (a .env file is read first by main).
// Storage selection:
// - DATABASE_URL=postgres://...  PostgreSQL
// - DATABASE_URL=sqlite:...      SQLite at that URL
// - DATABASE_URL=memory          in-memory dev mode, nothing persists
// - unset                        SQLite file at SQLITE_PATH (default celebration.db)

use anyhow::{Context, Result};
use comemora_core::DEFAULT_LOOKAHEAD_DAYS;
use comemora_storage::DEFAULT_SQLITE_PATH;
use std::time::Duration;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 5;

/// Where events are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Postgres(String),
    /// File path or `sqlite:` URL
    Sqlite(String),
    InMemory,
}

impl StorageConfig {
    fn from_vars(database_url: Option<String>, sqlite_path: Option<String>) -> Self {
        match database_url {
            Some(url) if url.trim().eq_ignore_ascii_case("memory") => Self::InMemory,
            Some(url) if url.starts_with("sqlite:") => Self::Sqlite(url),
            Some(url) => Self::Postgres(url),
            None => Self::Sqlite(sqlite_path.unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub bind_address: String,
    /// Prefix for API routes, e.g. "/api" gives /api/v1/events
    pub api_prefix: String,
    /// Allowed CORS origins; empty means same-origin only
    pub cors_origins: Vec<String>,
    pub lookahead_days: u64,
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let lookahead_days = match var("UPCOMING_LOOKAHEAD_DAYS") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("Invalid UPCOMING_LOOKAHEAD_DAYS: {}", v))?,
            None => DEFAULT_LOOKAHEAD_DAYS,
        };

        let shutdown_timeout_secs = match var("SHUTDOWN_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("Invalid SHUTDOWN_TIMEOUT_SECS: {}", v))?,
            None => DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        };

        let cors_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            storage: StorageConfig::from_vars(var("DATABASE_URL"), var("SQLITE_PATH")),
            bind_address: var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            api_prefix: var("API_PREFIX").unwrap_or_default(),
            cors_origins,
            lookahead_days,
            shutdown_timeout: Duration::from_secs(shutdown_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite("celebration.db".to_string())
        );
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.api_prefix, "");
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.lookahead_days, 3);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://localhost/comemora"),
            ("BIND_ADDRESS", "127.0.0.1:9000"),
            ("API_PREFIX", "/api"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,"),
            ("UPCOMING_LOOKAHEAD_DAYS", "7"),
            ("SHUTDOWN_TIMEOUT_SECS", "1"),
        ])
        .unwrap();

        assert_eq!(
            config.storage,
            StorageConfig::Postgres("postgres://localhost/comemora".to_string())
        );
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.lookahead_days, 7);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_empty_database_url_uses_sqlite_file() {
        let config = config(&[("DATABASE_URL", "  ")]).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite("celebration.db".to_string())
        );
    }

    #[test]
    fn test_sqlite_path() {
        let config = config(&[("SQLITE_PATH", "/var/lib/comemora/events.db")]).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite("/var/lib/comemora/events.db".to_string())
        );
    }

    #[test]
    fn test_sqlite_database_url_wins_over_path() {
        let config = config(&[
            ("DATABASE_URL", "sqlite://data/events.db"),
            ("SQLITE_PATH", "ignored.db"),
        ])
        .unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Sqlite("sqlite://data/events.db".to_string())
        );
    }

    #[test]
    fn test_memory_is_explicit_dev_mode() {
        let config = config(&[("DATABASE_URL", "memory")]).unwrap();
        assert_eq!(config.storage, StorageConfig::InMemory);
    }

    #[test]
    fn test_invalid_lookahead() {
        assert!(config(&[("UPCOMING_LOOKAHEAD_DAYS", "soon")]).is_err());
    }
}
