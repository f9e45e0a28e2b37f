// Storage layer for Comemora
// Decision: Support PostgreSQL, a SQLite file (default) and in-memory (dev mode)
//
// This crate provides database implementations for core traits:
// - Database: implements EventStore on PostgreSQL via sqlx
// - SqliteDatabase: implements EventStore on a SQLite file via sqlx
// - StorageBackend: enum dispatch over the databases and the in-memory store

pub mod backend;
pub mod event_store;
pub mod models;
pub mod repositories;
pub mod sqlite;

pub use backend::StorageBackend;
pub use models::*;
pub use repositories::*;
pub use sqlite::{SqliteDatabase, DEFAULT_SQLITE_PATH};
