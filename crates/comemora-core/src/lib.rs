// Comemora core
//
// Recurring-event notification engine, independent of storage and transport.
//
// Key design decisions:
// - Storage and delivery are traits (EventStore, Notifier) so adapters and
//   test doubles substitute both
// - Recurrence matching is by day and month only; year never participates
// - Message templates are static per event type; custom messages win verbatim
// - CSV transfer uses a fixed 9-column layout and a best-effort import policy
// - Dispatch failures are isolated per event and only logged
// - Every operation honors a CancellationToken at collaborator boundaries

pub mod error;
pub mod event;
pub mod notifier;
pub mod service;
pub mod traits;
pub mod transfer;

// In-memory implementations for dev mode and testing
pub mod memory;

// Re-exports for convenience
pub use error::{CelebrationError, Result};
pub use event::{Event, EventId, EventType, NotificationChannel, NAME_PLACEHOLDER};
pub use memory::{InMemoryEventStore, RecordingNotifier};
pub use notifier::{notification_line, ConsoleNotifier};
pub use service::{CelebrationService, NotifyReport, DEFAULT_LOOKAHEAD_DAYS};
pub use traits::{EventStore, Notifier};
pub use transfer::{export_events, import_rows, ImportRows, CSV_HEADER};

pub use tokio_util::sync::CancellationToken;
