// Console notification dispatcher
//
// Renders the notification line for an event and simulates the
// channel-specific delivery by logging it. Real delivery adapters implement
// the same Notifier trait.

use async_trait::async_trait;
use tracing::info;

use crate::error::{CelebrationError, Result};
use crate::event::{Event, NotificationChannel};
use crate::traits::Notifier;

/// Human-readable notification line for an event
pub fn notification_line(event: &Event) -> String {
    format!(
        "🎉 NOTIFICATION [{}] for {}: {} (Type: {})",
        event.preferred_channel,
        event.contact_destination,
        event.render_content(),
        event.event_type,
    )
}

/// Notifier that logs a simulated delivery for every supported channel
#[derive(Debug, Default, Clone)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, event: &Event) -> Result<()> {
        let destination = event.contact_destination.as_str();

        info!(
            event_id = event.id,
            channel = %event.preferred_channel,
            "{}",
            notification_line(event)
        );

        match event.preferred_channel.canonical() {
            NotificationChannel::Email => {
                info!(destination, "[MOCK] Sending Email SMTP");
            }
            NotificationChannel::Teams => {
                info!(destination, "[MOCK] Posting to Teams webhook");
            }
            NotificationChannel::WhatsApp => {
                info!(destination, "[MOCK] Sending WhatsApp via API");
            }
            NotificationChannel::Sms => {
                info!(destination, "[MOCK] Sending SMS via gateway");
            }
            NotificationChannel::Unsupported(tag) => {
                return Err(CelebrationError::notification(format!(
                    "unsupported channel '{}'",
                    tag
                )));
            }
        }
        Ok(())
    }
}
