//! Fan-out of one alert message to a recipient list over a single channel.
//!
//! Sends run sequentially on the caller's task. A recipient that fails is
//! recorded in the outcome and the batch carries on; only configuration
//! problems abort a dispatch, and they do so before anything is sent.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::channels::NotificationChannel;
use super::message::AlertMessage;
use crate::domain::AddressKind;
use crate::error::DeliveryError;
use crate::{Error, Result};

/// One recipient that could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDelivery {
    pub address: String,
    pub error: DeliveryError,
}

/// Per-recipient result of a dispatch, both lists in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOutcome {
    pub delivered: Vec<String>,
    pub failed: Vec<FailedDelivery>,
}

impl DispatchOutcome {
    /// Nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Some recipients were reached and some were not.
    pub fn is_partial(&self) -> bool {
        !self.delivered.is_empty() && !self.failed.is_empty()
    }

    pub fn failure_for(&self, address: &str) -> Option<&DeliveryError> {
        self.failed
            .iter()
            .find(|f| f.address == address)
            .map(|f| &f.error)
    }

    /// Number of distinct recipients attempted.
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }
}

/// Sends alert messages through one bound channel.
#[derive(Clone)]
pub struct AlertDispatcher {
    channel: Option<Arc<dyn NotificationChannel>>,
}

impl AlertDispatcher {
    pub fn new(channel: Arc<dyn NotificationChannel>) -> Self {
        Self {
            channel: Some(channel),
        }
    }

    /// A dispatcher with no channel. Every dispatch fails as misconfigured.
    pub fn unbound() -> Self {
        Self { channel: None }
    }

    /// Address kind of the bound channel.
    pub fn address_kind(&self) -> Option<AddressKind> {
        self.channel.as_ref().map(|c| c.address_kind())
    }

    pub fn channel_type(&self) -> Option<&'static str> {
        self.channel.as_ref().map(|c| c.channel_type())
    }

    /// Attempt delivery of `message` to every recipient.
    ///
    /// Fails with [`Error::MisconfiguredDispatcher`] when no channel is bound
    /// or `recipients` is empty. Duplicate addresses are attempted once.
    pub async fn dispatch(
        &self,
        message: &AlertMessage,
        recipients: &[String],
    ) -> Result<DispatchOutcome> {
        let channel = self
            .channel
            .as_ref()
            .ok_or_else(|| Error::misconfigured("no notification channel bound"))?;

        if recipients.is_empty() {
            return Err(Error::misconfigured("recipient list is empty"));
        }

        let mut outcome = DispatchOutcome::default();
        let mut seen = HashSet::with_capacity(recipients.len());

        for recipient in recipients {
            if !seen.insert(recipient.as_str()) {
                debug!(alert_id = %message.id, recipient = %recipient, "Skipping duplicate recipient");
                continue;
            }

            let result = match channel.validate_address(recipient) {
                Ok(()) => channel.send(message, recipient).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => {
                    debug!(
                        alert_id = %message.id,
                        channel = channel.channel_type(),
                        recipient = %recipient,
                        "Alert delivered"
                    );
                    outcome.delivered.push(recipient.clone());
                }
                Err(e) => {
                    warn!(
                        alert_id = %message.id,
                        channel = channel.channel_type(),
                        recipient = %recipient,
                        "Alert delivery failed: {}",
                        e
                    );
                    outcome.failed.push(FailedDelivery {
                        address: recipient.clone(),
                        error: e,
                    });
                }
            }
        }

        info!(
            alert_id = %message.id,
            subject = %message.subject_id,
            severity = %message.severity,
            channel = channel.channel_type(),
            attempted = outcome.attempted(),
            delivered = outcome.delivered.len(),
            failed = outcome.failed.len(),
            "Dispatch finished"
        );

        Ok(outcome)
    }
}

impl std::fmt::Debug for AlertDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertDispatcher")
            .field("channel", &self.channel_type())
            .finish()
    }
}
