// In-memory implementations for dev mode and testing
//
// These implementations keep all data in memory, making them a fit for:
// - Running the API without a database
// - Unit and router tests
// - Quick prototyping

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::error::{CelebrationError, Result};
use crate::event::{Event, EventId};
use crate::traits::{EventStore, Notifier};

// ============================================================================
// InMemoryEventStore - Stores events in memory
// ============================================================================

#[derive(Debug, Default)]
struct EventTable {
    rows: BTreeMap<EventId, Event>,
    last_id: EventId,
}

/// In-memory event store
///
/// Ids are assigned sequentially starting at 1. All data is lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    table: Arc<RwLock<EventTable>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events
    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save(&self, mut event: Event) -> Result<Event> {
        let mut table = self.table.write();
        let now = Utc::now();

        if event.id == 0 {
            table.last_id += 1;
            event.id = table.last_id;
            event.created_at = now;
        } else {
            table.last_id = table.last_id.max(event.id);
            if let Some(existing) = table.rows.get(&event.id) {
                event.created_at = existing.created_at;
            }
        }
        event.updated_at = now;

        table.rows.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Event>> {
        Ok(self.table.read().rows.values().cloned().collect())
    }

    async fn delete(&self, id: EventId) -> Result<bool> {
        Ok(self.table.write().rows.remove(&id).is_some())
    }

    async fn find_by_day_month(&self, day: u32, month: u32) -> Result<Vec<Event>> {
        Ok(self
            .table
            .read()
            .rows
            .values()
            .filter(|e| e.occurs_on(day, month))
            .cloned()
            .collect())
    }
}

// ============================================================================
// RecordingNotifier - Collects dispatched events
// ============================================================================

/// Notifier that records every delivery attempt instead of sending it
///
/// Events whose name was registered with `fail_for` are rejected, which lets
/// tests exercise per-event failure isolation.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<Event>>>,
    failing: Arc<RwLock<HashSet<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject deliveries for events with this name
    pub fn fail_for(self, name: impl Into<String>) -> Self {
        self.failing.write().insert(name.into());
        self
    }

    /// Events delivered successfully, in dispatch order
    pub fn sent(&self) -> Vec<Event> {
        self.sent.read().clone()
    }

    /// Names of events delivered successfully, in dispatch order
    pub fn sent_names(&self) -> Vec<String> {
        self.sent.read().iter().map(|e| e.name.clone()).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, event: &Event) -> Result<()> {
        if self.failing.read().contains(&event.name) {
            return Err(CelebrationError::notification(format!(
                "delivery to {} rejected",
                event.contact_destination
            )));
        }
        self.sent.write().push(event.clone());
        Ok(())
    }
}
