//! Routine reminders for patients.

use std::sync::Arc;

use tracing::{info, warn};

use super::channels::NotificationChannel;
use super::events::ReminderEvent;
use crate::domain::AddressKind;
use crate::error::DeliveryError;
use crate::{Error, Result};

/// Sends one reminder per event over a single channel.
///
/// Reminders are best effort: a failure is returned to the caller and logged,
/// never retried.
pub struct ReminderScheduler {
    channel: Arc<dyn NotificationChannel>,
}

impl ReminderScheduler {
    pub fn new(channel: Arc<dyn NotificationChannel>) -> Self {
        Self { channel }
    }

    pub fn address_kind(&self) -> AddressKind {
        self.channel.address_kind()
    }

    /// Reject a recipient the channel can never deliver to.
    pub fn check_recipient(&self, recipient: &str) -> Result<()> {
        self.channel
            .validate_address(recipient)
            .map_err(|e| Error::InvalidAddress(e.to_string()))
    }

    /// Format and send the reminder for `event` to `recipient`.
    pub async fn remind(
        &self,
        event: &ReminderEvent,
        recipient: &str,
    ) -> std::result::Result<(), DeliveryError> {
        self.channel.validate_address(recipient).inspect_err(|e| {
            warn!(event = event.event_type(), recipient, "Reminder not sent: {}", e);
        })?;

        let message = event.to_message();
        match self.channel.send(&message, recipient).await {
            Ok(()) => {
                info!(
                    event = event.event_type(),
                    patient = event.patient_id(),
                    channel = self.channel.channel_type(),
                    "Reminder sent"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    event = event.event_type(),
                    patient = event.patient_id(),
                    channel = self.channel.channel_type(),
                    "Reminder delivery failed: {}",
                    e
                );
                Err(e)
            }
        }
    }
}
