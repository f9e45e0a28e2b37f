// Database models (internal, may differ from the core Event type)

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comemora_core::{Event, EventType, NotificationChannel};
use sqlx::types::Json;
use sqlx::FromRow;

/// Column list shared by every events query
pub const EVENT_COLUMNS: &str = "id, name, day, month, year, event_type, tags, preferred_channel, \
     contact_destination, custom_message, is_important, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub name: String,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub event_type: String,
    pub tags: Vec<String>,
    pub preferred_channel: String,
    pub contact_destination: String,
    pub custom_message: String,
    pub is_important: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            name: row.name,
            // Columns are only ever written from u32 values
            day: u32::try_from(row.day).unwrap_or_default(),
            month: u32::try_from(row.month).unwrap_or_default(),
            year: row.year,
            event_type: EventType::from(row.event_type),
            tags: row.tags,
            preferred_channel: NotificationChannel::from(row.preferred_channel),
            contact_destination: row.contact_destination,
            custom_message: row.custom_message,
            is_important: row.is_important,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// SQLite has no array type; tags are stored as a JSON array
#[derive(Debug, Clone, FromRow)]
pub struct SqliteEventRow {
    pub id: i64,
    pub name: String,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub event_type: String,
    pub tags: Json<Vec<String>>,
    pub preferred_channel: String,
    pub contact_destination: String,
    pub custom_message: String,
    pub is_important: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SqliteEventRow> for EventRow {
    fn from(row: SqliteEventRow) -> Self {
        EventRow {
            id: row.id,
            name: row.name,
            day: row.day,
            month: row.month,
            year: row.year,
            event_type: row.event_type,
            tags: row.tags.0,
            preferred_channel: row.preferred_channel,
            contact_destination: row.contact_destination,
            custom_message: row.custom_message,
            is_important: row.is_important,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<SqliteEventRow> for Event {
    fn from(row: SqliteEventRow) -> Self {
        EventRow::from(row).into()
    }
}

/// Values bound by insert/upsert statements
#[derive(Debug, Clone)]
pub struct SaveEventRow {
    pub id: i64,
    pub name: String,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub event_type: String,
    pub tags: Vec<String>,
    pub preferred_channel: String,
    pub contact_destination: String,
    pub custom_message: String,
    pub is_important: bool,
}

impl TryFrom<Event> for SaveEventRow {
    type Error = anyhow::Error;

    fn try_from(event: Event) -> Result<Self> {
        Ok(Self {
            id: event.id,
            day: i32::try_from(event.day).context("day out of range")?,
            month: i32::try_from(event.month).context("month out of range")?,
            name: event.name,
            year: event.year,
            event_type: event.event_type.into(),
            tags: event.tags,
            preferred_channel: event.preferred_channel.into(),
            contact_destination: event.contact_destination,
            custom_message: event.custom_message,
            is_important: event.is_important,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_to_save_row() {
        let event = Event::new("Ana", 15, 6, EventType::from("formatura"))
            .with_channel(NotificationChannel::Sms, "+55")
            .with_tags(vec!["family".to_string()])
            .important(true);

        let row = SaveEventRow::try_from(event).unwrap();
        assert_eq!(row.id, 0);
        assert_eq!(row.day, 15);
        assert_eq!(row.month, 6);
        assert_eq!(row.event_type, "formatura");
        assert_eq!(row.preferred_channel, "SMS");
        assert_eq!(row.tags, vec!["family"]);
    }

    #[test]
    fn test_out_of_range_day_is_rejected() {
        let event = Event::new("Ana", u32::MAX, 6, EventType::Other);
        assert!(SaveEventRow::try_from(event).is_err());
    }

    #[test]
    fn test_row_to_event() {
        let now = Utc::now();
        let row = EventRow {
            id: 42,
            name: "Rex".to_string(),
            day: 1,
            month: 2,
            year: 2019,
            event_type: "pet".to_string(),
            tags: vec![],
            preferred_channel: "WhatsApp".to_string(),
            contact_destination: "+55".to_string(),
            custom_message: String::new(),
            is_important: false,
            created_at: now,
            updated_at: now,
        };

        let event = Event::from(row);
        assert_eq!(event.id, 42);
        assert_eq!(event.event_type, EventType::Pet);
        assert_eq!(event.preferred_channel, NotificationChannel::WhatsApp);
        assert!(event.occurs_on(1, 2));
    }
}
