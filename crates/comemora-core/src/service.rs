// Celebration service - orchestration of the public operations
//
// CelebrationService composes an EventStore and a Notifier into the
// operations exposed to transports: create, list, get, delete, CSV
// export/import and the check-and-notify trigger.
//
// Every operation takes a CancellationToken. Each storage or dispatch call is
// raced against it, so a fired token stops the operation at the next
// collaborator boundary. Work already done is not rolled back.

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};

use crate::error::{CelebrationError, Result};
use crate::event::{Event, EventId};
use crate::traits::{EventStore, Notifier};
use crate::transfer;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Days between "today" and the date whose important events are pre-notified
pub const DEFAULT_LOOKAHEAD_DAYS: u64 = 3;

/// Outcome of a check-and-notify run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NotifyReport {
    /// Date treated as "today"
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2026-06-15"))]
    pub date: NaiveDate,
    /// Lookahead date checked for important events
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2026-06-18"))]
    pub upcoming_date: NaiveDate,
    /// Events due today (all dispatched)
    pub due_today: usize,
    /// Important events due on the lookahead date (all dispatched)
    pub upcoming_important: usize,
    /// Dispatches that succeeded
    pub delivered: usize,
    /// Dispatches that failed (logged, not propagated)
    pub failed: usize,
}

impl NotifyReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Orchestrates event management and notification
pub struct CelebrationService<S, N>
where
    S: EventStore,
    N: Notifier,
{
    store: S,
    notifier: N,
    lookahead_days: u64,
}

impl<S, N> CelebrationService<S, N>
where
    S: EventStore,
    N: Notifier,
{
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }

    /// Override the lookahead window (in days)
    pub fn with_lookahead_days(mut self, days: u64) -> Self {
        self.lookahead_days = days;
        self
    }

    pub fn lookahead_days(&self) -> u64 {
        self.lookahead_days
    }

    /// Get reference to the event store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get reference to the notifier
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    // ========================================================================
    // Event management
    // ========================================================================

    /// Validate and persist a new event
    pub async fn create_event(&self, event: Event, cancel: &CancellationToken) -> Result<Event> {
        if event.name.is_empty() {
            return Err(CelebrationError::validation("event name is required"));
        }

        let saved = guarded(cancel, self.store.save(event)).await?;
        info!(event_id = saved.id, event_type = %saved.event_type, "Event created");
        Ok(saved)
    }

    pub async fn list_events(&self, cancel: &CancellationToken) -> Result<Vec<Event>> {
        guarded(cancel, self.store.list()).await
    }

    pub async fn get_event(
        &self,
        id: EventId,
        cancel: &CancellationToken,
    ) -> Result<Option<Event>> {
        guarded(cancel, self.store.find_by_id(id)).await
    }

    pub async fn delete_event(&self, id: EventId, cancel: &CancellationToken) -> Result<bool> {
        let deleted = guarded(cancel, self.store.delete(id)).await?;
        if deleted {
            info!(event_id = id, "Event deleted");
        }
        Ok(deleted)
    }

    // ========================================================================
    // CSV transfer
    // ========================================================================

    /// Export every stored event as CSV
    pub async fn export_events(&self, cancel: &CancellationToken) -> Result<Vec<u8>> {
        let events = guarded(cancel, self.store.list()).await?;
        let data = transfer::export_events(&events)?;
        debug!(count = events.len(), bytes = data.len(), "Events exported");
        Ok(data)
    }

    /// Import events from CSV, saving each row as a new event.
    ///
    /// Rows are persisted one by one: a save failure keeps the rows already
    /// saved and aborts the rest. Returns the number of rows saved.
    pub async fn import_events(&self, data: &[u8], cancel: &CancellationToken) -> Result<usize> {
        let mut rows = transfer::import_rows(data)?;
        let mut imported = 0;

        for event in rows.by_ref() {
            guarded(cancel, self.store.save(event)).await.map_err(|e| {
                error!(imported, error = %e, "Import aborted");
                e
            })?;
            imported += 1;
        }

        info!(imported, skipped = rows.skipped(), "Events imported");
        Ok(imported)
    }

    // ========================================================================
    // Notification trigger
    // ========================================================================

    /// Notify about events due today (local date) and important events due
    /// at the end of the lookahead window.
    pub async fn check_and_notify(&self, cancel: &CancellationToken) -> Result<NotifyReport> {
        self.check_and_notify_on(Local::now().date_naive(), cancel)
            .await
    }

    /// Same as `check_and_notify`, treating `today` as the current date.
    ///
    /// Dispatch failures are logged and counted but never fail the run. The
    /// two sets are not deduplicated: with a zero lookahead an important event
    /// is dispatched twice.
    pub async fn check_and_notify_on(
        &self,
        today: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<NotifyReport> {
        let upcoming = today
            .checked_add_days(Days::new(self.lookahead_days))
            .ok_or_else(|| {
                CelebrationError::Internal(anyhow::anyhow!(
                    "lookahead of {} days from {} is out of range",
                    self.lookahead_days,
                    today
                ))
            })?;

        let span = tracing::info_span!(
            "check_and_notify",
            date = %today,
            upcoming_date = %upcoming,
        );

        self.check_and_notify_inner(today, upcoming, cancel)
            .instrument(span)
            .await
    }

    async fn check_and_notify_inner(
        &self,
        today: NaiveDate,
        upcoming: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<NotifyReport> {
        use chrono::Datelike;

        let due_today = guarded(
            cancel,
            self.store.find_by_day_month(today.day(), today.month()),
        )
        .await?;
        let due_upcoming = guarded(
            cancel,
            self.store.find_by_day_month(upcoming.day(), upcoming.month()),
        )
        .await?;

        let mut report = NotifyReport {
            date: today,
            upcoming_date: upcoming,
            due_today: 0,
            upcoming_important: 0,
            delivered: 0,
            failed: 0,
        };

        for event in &due_today {
            info!(event_id = event.id, name = %event.name, "Processing event due today");
            report.due_today += 1;
            self.dispatch(event, &mut report, cancel).await?;
        }

        for event in due_upcoming.iter().filter(|e| e.is_important) {
            info!(
                event_id = event.id,
                name = %event.name,
                "Processing upcoming important event"
            );
            report.upcoming_important += 1;
            self.dispatch(event, &mut report, cancel).await?;
        }

        info!(
            due_today = report.due_today,
            upcoming_important = report.upcoming_important,
            delivered = report.delivered,
            failed = report.failed,
            "Check and notify finished"
        );
        Ok(report)
    }

    /// Send one notification. Only cancellation is propagated.
    async fn dispatch(
        &self,
        event: &Event,
        report: &mut NotifyReport,
        cancel: &CancellationToken,
    ) -> Result<()> {
        match guarded(cancel, self.notifier.send(event)).await {
            Ok(()) => report.delivered += 1,
            Err(CelebrationError::Cancelled) => return Err(CelebrationError::Cancelled),
            Err(e) => {
                warn!(
                    event_id = event.id,
                    channel = %event.preferred_channel,
                    error = %e,
                    "Failed to notify"
                );
                report.failed += 1;
            }
        }
        Ok(())
    }
}

/// Run a collaborator call unless (or until) the token fires
async fn guarded<T, F>(cancel: &CancellationToken, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CelebrationError::Cancelled),
        result = call => result,
    }
}
