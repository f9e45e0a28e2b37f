// Database-backed EventStore implementations
//
// Implements the core EventStore trait on top of the PostgreSQL and SQLite
// repositories.
// Storage errors are surfaced as CelebrationError::Storage with the underlying
// message.

use async_trait::async_trait;
use comemora_core::{CelebrationError, Event, EventId, EventStore, Result};

use crate::models::SaveEventRow;
use crate::repositories::Database;
use crate::sqlite::SqliteDatabase;

fn store_err(e: anyhow::Error) -> CelebrationError {
    CelebrationError::store(format!("{:#}", e))
}

// Out-of-range keys cannot match anything stored
fn day_month_key(day: u32, month: u32) -> Option<(i32, i32)> {
    Some((i32::try_from(day).ok()?, i32::try_from(month).ok()?))
}

#[async_trait]
impl EventStore for Database {
    async fn save(&self, event: Event) -> Result<Event> {
        let input = SaveEventRow::try_from(event).map_err(store_err)?;
        let row = if input.id == 0 {
            self.insert_event(input).await
        } else {
            self.upsert_event(input).await
        }
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>> {
        let row = self.get_event(id).await.map_err(store_err)?;
        Ok(row.map(Event::from))
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let rows = self.list_events().await.map_err(store_err)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn delete(&self, id: EventId) -> Result<bool> {
        self.delete_event(id).await.map_err(store_err)
    }

    async fn find_by_day_month(&self, day: u32, month: u32) -> Result<Vec<Event>> {
        let Some((day, month)) = day_month_key(day, month) else {
            return Ok(Vec::new());
        };
        let rows = self
            .list_events_by_day_month(day, month)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }
}

#[async_trait]
impl EventStore for SqliteDatabase {
    async fn save(&self, event: Event) -> Result<Event> {
        let input = SaveEventRow::try_from(event).map_err(store_err)?;
        let row = if input.id == 0 {
            self.insert_event(input).await
        } else {
            self.upsert_event(input).await
        }
        .map_err(store_err)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>> {
        let row = self.get_event(id).await.map_err(store_err)?;
        Ok(row.map(Event::from))
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let rows = self.list_events().await.map_err(store_err)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn delete(&self, id: EventId) -> Result<bool> {
        self.delete_event(id).await.map_err(store_err)
    }

    async fn find_by_day_month(&self, day: u32, month: u32) -> Result<Vec<Event>> {
        let Some((day, month)) = day_month_key(day, month) else {
            return Ok(Vec::new());
        };
        let rows = self
            .list_events_by_day_month(day, month)
            .await
            .map_err(store_err)?;
        Ok(rows.into_iter().map(Event::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comemora_core::EventType;

    #[tokio::test]
    async fn test_sqlite_store_save_and_find() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let saved = db
            .save(Event::new("Ana", 15, 6, EventType::Birthday).with_year(1990))
            .await
            .unwrap();
        assert!(saved.is_persisted());

        let due = db.find_by_day_month(15, 6).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].event_type, EventType::Birthday);
        assert!(db.find_by_day_month(u32::MAX, 6).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_store_rejects_out_of_range_day() {
        let db = SqliteDatabase::in_memory().await.unwrap();
        db.migrate().await.unwrap();

        let err = db
            .save(Event::new("Ana", u32::MAX, 6, EventType::Other))
            .await
            .unwrap_err();
        assert!(matches!(err, CelebrationError::Storage(_)));
    }
}
