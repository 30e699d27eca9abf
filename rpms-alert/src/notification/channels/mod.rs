//! Notification channels.
//!
//! This module provides the channels an alert can be delivered through:
//! - Email (SMTP)
//! - SMS (Twilio REST API)

mod email;
mod sms;

pub use email::{EmailChannel, EmailConfig};
pub use sms::{SmsChannel, SmsConfig};

use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::message::AlertMessage;
use super::transport::{SmtpMailTransport, TwilioGateway};
use crate::Result;
use crate::domain::AddressKind;
use crate::error::DeliveryError;

/// Trait for notification channels.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Get the channel type name.
    fn channel_type(&self) -> &'static str;

    /// Kind of address this channel delivers to.
    fn address_kind(&self) -> AddressKind;

    /// Whether the channel needs authentication material to send.
    fn requires_credentials(&self) -> bool;

    /// Reject a recipient that can never be delivered to. Performs no I/O.
    fn validate_address(&self, recipient: &str) -> std::result::Result<(), DeliveryError>;

    /// Deliver `message` to a single recipient.
    async fn send(
        &self,
        message: &AlertMessage,
        recipient: &str,
    ) -> std::result::Result<(), DeliveryError>;
}

/// Selects which configured channel to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    #[default]
    Email,
    Sms,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a production channel with its network transport.
pub fn build_channel(
    kind: ChannelKind,
    email: &EmailConfig,
    sms: &SmsConfig,
) -> Result<Arc<dyn NotificationChannel>> {
    let channel: Arc<dyn NotificationChannel> = match kind {
        ChannelKind::Email => {
            let transport = SmtpMailTransport::new(email)?;
            Arc::new(EmailChannel::new(email.clone(), Arc::new(transport)))
        }
        ChannelKind::Sms => {
            let gateway = TwilioGateway::new(sms)?;
            Arc::new(SmsChannel::new(Arc::new(gateway)))
        }
    };
    Ok(channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_channel_kind_display() {
        assert_eq!(ChannelKind::Email.to_string(), "email");
        assert_eq!(ChannelKind::Sms.to_string(), "sms");
        assert_eq!(ChannelKind::default(), ChannelKind::Email);
    }

    #[test]
    fn test_build_sms_without_credentials_fails() {
        let result = build_channel(
            ChannelKind::Sms,
            &EmailConfig::default(),
            &SmsConfig::default(),
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn test_build_email_channel() {
        let email = EmailConfig {
            smtp_host: "localhost".to_string(),
            use_tls: false,
            from_address: "alerts@clinic.example".to_string(),
            ..Default::default()
        };
        let channel = build_channel(ChannelKind::Email, &email, &SmsConfig::default()).unwrap();
        assert_eq!(channel.channel_type(), "email");
        assert_eq!(channel.address_kind(), AddressKind::Email);
    }
}
