// Repository layer for database operations

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/postgres")
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
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (name, day, month, year, event_type, tags, preferred_channel,
                                contact_destination, custom_message, is_important)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.day)
        .bind(input.month)
        .bind(input.year)
        .bind(&input.event_type)
        .bind(&input.tags)
        .bind(&input.preferred_channel)
        .bind(&input.contact_destination)
        .bind(&input.custom_message)
        .bind(input.is_important)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Insert or overwrite the row with `input.id`
    pub async fn upsert_event(&self, input: SaveEventRow) -> Result<EventRow> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (id, name, day, month, year, event_type, tags, preferred_channel,
                                contact_destination, custom_message, is_important)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                day = EXCLUDED.day,
                month = EXCLUDED.month,
                year = EXCLUDED.year,
                event_type = EXCLUDED.event_type,
                tags = EXCLUDED.tags,
                preferred_channel = EXCLUDED.preferred_channel,
                contact_destination = EXCLUDED.contact_destination,
                custom_message = EXCLUDED.custom_message,
                is_important = EXCLUDED.is_important,
                updated_at = NOW()
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(input.id)
        .bind(&input.name)
        .bind(input.day)
        .bind(input.month)
        .bind(input.year)
        .bind(&input.event_type)
        .bind(&input.tags)
        .bind(&input.preferred_channel)
        .bind(&input.contact_destination)
        .bind(&input.custom_message)
        .bind(input.is_important)
        .fetch_one(&mut *tx)
        .await?;

        // Explicit ids bypass the sequence. Only ever move it forward so ids
        // of deleted rows are not handed out again.
        sqlx::query(
            r#"
            SELECT setval('events_id_seq',
                          GREATEST((SELECT MAX(id) FROM events),
                                   (SELECT last_value FROM events_id_seq)))
            "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn get_event(&self, id: i64) -> Result<Option<EventRow>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_events(&self) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn delete_event(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Events recurring on the given day and month, any year
    pub async fn list_events_by_day_month(&self, day: i32, month: i32) -> Result<Vec<EventRow>> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE day = $1 AND month = $2
            ORDER BY id ASC
            "#
        ))
        .bind(day)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
