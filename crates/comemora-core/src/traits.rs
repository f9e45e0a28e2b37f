// Core traits for pluggable backends
//
// These traits allow the celebration service to be used with different backends:
// - In-memory implementations for dev mode and testing
// - Database implementations for production
// - Real delivery adapters for notifications

use async_trait::async_trait;

use crate::error::Result;
use crate::event::{Event, EventId};

// ============================================================================
// EventStore - For persisting and querying events
// ============================================================================

/// Trait for storing and retrieving events
///
/// Errors are opaque to the core and propagated to the caller unchanged.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert or overwrite an event.
    ///
    /// An event with `id == 0` gets a fresh id; any other id overwrites the
    /// stored row with that id. Returns the stored event.
    async fn save(&self, event: Event) -> Result<Event>;

    /// Get an event by id
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>>;

    /// List all events in ascending id order
    async fn list(&self) -> Result<Vec<Event>>;

    /// Delete an event. Returns false if it did not exist.
    async fn delete(&self, id: EventId) -> Result<bool>;

    /// Every event whose day and month equal the arguments, any year.
    ///
    /// Exact match only, and no filtering on `is_important`.
    async fn find_by_day_month(&self, day: u32, month: u32) -> Result<Vec<Event>>;
}

// ============================================================================
// Notifier - For delivering notifications
// ============================================================================

/// Trait for delivering a notification about an event
///
/// Implementations route on `event.preferred_channel`. A failed delivery is
/// reported through the returned error, never by panicking.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, event: &Event) -> Result<()>;
}

#[async_trait]
impl<T: EventStore + ?Sized> EventStore for std::sync::Arc<T> {
    async fn save(&self, event: Event) -> Result<Event> {
        (**self).save(event).await
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>> {
        (**self).find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Event>> {
        (**self).list().await
    }

    async fn delete(&self, id: EventId) -> Result<bool> {
        (**self).delete(id).await
    }

    async fn find_by_day_month(&self, day: u32, month: u32) -> Result<Vec<Event>> {
        (**self).find_by_day_month(day, month).await
    }
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    async fn send(&self, event: &Event) -> Result<()> {
        (**self).send(event).await
    }
}
