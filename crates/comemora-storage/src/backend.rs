// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// This module provides a unified StorageBackend enum that can work with
// PostgreSQL, a SQLite file (the default) or in-memory (dev mode) storage.

use anyhow::Result;
use async_trait::async_trait;
use comemora_core::{Event, EventId, EventStore, InMemoryEventStore};

use crate::repositories::Database;
use crate::sqlite::SqliteDatabase;

/// Storage backend: PostgreSQL, SQLite or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// SQLite database file
    Sqlite(SqliteDatabase),
    /// In-memory store (dev mode)
    InMemory(InMemoryEventStore),
}

impl StorageBackend {
    /// Connect to PostgreSQL and apply migrations
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        db.migrate().await?;
        tracing::debug!("Using PostgreSQL storage backend");
        Ok(Self::Postgres(db))
    }

    /// Open (or create) a SQLite database and apply migrations
    pub async fn sqlite(location: &str) -> Result<Self> {
        let db = SqliteDatabase::open(location).await?;
        db.migrate().await?;
        tracing::debug!(location = %location, "Using SQLite storage backend");
        Ok(Self::Sqlite(db))
    }

    /// Create an in-memory storage backend. Nothing survives a restart.
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryEventStore::new())
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Short name for logs and health checks
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Sqlite(_) => "sqlite",
            Self::InMemory(_) => "memory",
        }
    }
}

#[async_trait]
impl EventStore for StorageBackend {
    async fn save(&self, event: Event) -> comemora_core::Result<Event> {
        match self {
            Self::Postgres(db) => db.save(event).await,
            Self::Sqlite(db) => db.save(event).await,
            Self::InMemory(db) => db.save(event).await,
        }
    }

    async fn find_by_id(&self, id: EventId) -> comemora_core::Result<Option<Event>> {
        match self {
            Self::Postgres(db) => db.find_by_id(id).await,
            Self::Sqlite(db) => db.find_by_id(id).await,
            Self::InMemory(db) => db.find_by_id(id).await,
        }
    }

    async fn list(&self) -> comemora_core::Result<Vec<Event>> {
        match self {
            Self::Postgres(db) => db.list().await,
            Self::Sqlite(db) => db.list().await,
            Self::InMemory(db) => db.list().await,
        }
    }

    async fn delete(&self, id: EventId) -> comemora_core::Result<bool> {
        match self {
            Self::Postgres(db) => db.delete(id).await,
            Self::Sqlite(db) => db.delete(id).await,
            Self::InMemory(db) => db.delete(id).await,
        }
    }

    async fn find_by_day_month(&self, day: u32, month: u32) -> comemora_core::Result<Vec<Event>> {
        match self {
            Self::Postgres(db) => db.find_by_day_month(day, month).await,
            Self::Sqlite(db) => db.find_by_day_month(day, month).await,
            Self::InMemory(db) => db.find_by_day_month(day, month).await,
        }
    }
}
