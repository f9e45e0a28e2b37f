// SQLite repository, the default single-file store

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::models::*;

/// Default database file when nothing else is configured
pub const DEFAULT_SQLITE_PATH: &str = "celebration.db";

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a database file path or `sqlite:` URL, creating the file if needed
    pub async fn open(location: &str) -> Result<Self> {
        let options = if location.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(location)
                .with_context(|| format!("Invalid SQLite URL: {location}"))?
        } else {
            SqliteConnectOptions::new().filename(location)
        }
        .create_if_missing(true);

        // A memory database lives and dies with its connection
        let pool = if location.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        Ok(Self { pool })
    }

    /// Private database that disappears with the pool. Used by tests.
    pub async fn in_memory() -> Result<Self> {
        Self::open("sqlite::memory:").await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    pub async fn insert_event(&self, input: SaveEventRow) -> Result<EventRow> {
        self.write_event(None, input).await
    }

    /// Insert or overwrite the row with `input.id`
    pub async fn upsert_event(&self, input: SaveEventRow) -> Result<EventRow> {
        let id = input.id;
        self.write_event(Some(id), input).await
    }

    // A NULL id lets SQLite assign the next one
    async fn write_event(&self, id: Option<i64>, input: SaveEventRow) -> Result<EventRow> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, SqliteEventRow>(&format!(
            r#"
            INSERT INTO events (id, name, day, month, year, event_type, tags, preferred_channel,
                                contact_destination, custom_message, is_important,
                                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                day = excluded.day,
                month = excluded.month,
                year = excluded.year,
                event_type = excluded.event_type,
                tags = excluded.tags,
                preferred_channel = excluded.preferred_channel,
                contact_destination = excluded.contact_destination,
                custom_message = excluded.custom_message,
                is_important = excluded.is_important,
                updated_at = excluded.updated_at
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.day)
        .bind(input.month)
        .bind(input.year)
        .bind(&input.event_type)
        .bind(Json(&input.tags))
        .bind(&input.preferred_channel)
        .bind(&input.contact_destination)
        .bind(&input.custom_message)
        .bind(input.is_important)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    pub async fn get_event(&self, id: i64) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, SqliteEventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EventRow::from))
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, SqliteEventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EventRow::from).collect())
    }

    pub async fn delete_event(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Events recurring on the given day and month, any year
    pub async fn list_events_by_day_month(&self, day: i32, month: i32) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, SqliteEventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE day = ? AND month = ?
            ORDER BY id ASC
            "#
        ))
        .bind(day)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EventRow::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comemora_core::{Event, EventType, NotificationChannel};

    async fn test_db() -> SqliteDatabase {
        let db = SqliteDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn row(event: Event) -> SaveEventRow {
        SaveEventRow::try_from(event).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;

        let saved = db
            .insert_event(row(Event::new("Ana", 15, 6, EventType::Birthday)
                .with_year(1990)
                .with_tags(vec!["family".to_string(), "close".to_string()])
                .with_channel(NotificationChannel::Sms, "+5511999999999")
                .important(true)))
            .await
            .unwrap();
        assert_eq!(saved.id, 1);

        let loaded = db.get_event(saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Ana");
        assert_eq!(loaded.year, 1990);
        assert_eq!(loaded.tags, vec!["family", "close"]);
        assert_eq!(loaded.preferred_channel, "SMS");
        assert!(loaded.is_important);

        assert!(db.get_event(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_keeps_created_at() {
        let db = test_db().await;

        let first = db
            .insert_event(row(Event::new("Ana", 15, 6, EventType::Birthday)))
            .await
            .unwrap();

        let mut changed = Event::from(first.clone());
        changed.name = "Ana Maria".to_string();
        let second = db.upsert_event(row(changed)).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Ana Maria");
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(db.list_events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_with_unknown_id_inserts() {
        let db = test_db().await;

        let mut event = Event::new("Rex", 1, 2, EventType::Pet);
        event.id = 7;
        let saved = db.upsert_event(row(event)).await.unwrap();
        assert_eq!(saved.id, 7);

        // Later inserts continue after the explicit id
        let next = db
            .insert_event(row(Event::new("Bia", 1, 2, EventType::Other)))
            .await
            .unwrap();
        assert_eq!(next.id, 8);
    }

    #[tokio::test]
    async fn test_no_id_reuse_after_delete_and_resave() {
        let db = test_db().await;

        let mut saved = Vec::new();
        for name in ["A", "B", "C"] {
            saved.push(
                db.insert_event(row(Event::new(name, 1, 1, EventType::Other)))
                    .await
                    .unwrap(),
            );
        }
        assert!(db.delete_event(saved[2].id).await.unwrap());

        // Re-saving an older event must not rewind the id counter
        db.upsert_event(row(Event::from(saved[0].clone())))
            .await
            .unwrap();

        let next = db
            .insert_event(row(Event::new("D", 1, 1, EventType::Other)))
            .await
            .unwrap();
        assert!(next.id > saved[2].id);
    }

    #[tokio::test]
    async fn test_list_by_day_month_ignores_year() {
        let db = test_db().await;

        for (name, day, month, year) in [("Ana", 15, 6, 1990), ("Bia", 15, 6, 0), ("Caio", 16, 6, 1990)] {
            db.insert_event(row(Event::new(name, day, month, EventType::Birthday).with_year(year)))
                .await
                .unwrap();
        }

        let due = db.list_events_by_day_month(15, 6).await.unwrap();
        let names: Vec<_> = due.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bia"]);

        assert!(db.list_events_by_day_month(15, 7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_returns_false() {
        let db = test_db().await;
        assert!(!db.delete_event(1).await.unwrap());
    }
}
