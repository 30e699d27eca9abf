//! Network transports behind the notification channels.
//!
//! Channels validate and format; transports move bytes. Both transports are
//! injected into their channel so tests can substitute fakes.

mod smtp;
mod twilio;

pub use smtp::SmtpMailTransport;
pub use twilio::TwilioGateway;

use async_trait::async_trait;

use crate::error::DeliveryError;

/// A fully formatted plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers formatted emails.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), DeliveryError>;
}

/// Submits text messages to an SMS provider.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn submit(&self, to: &str, body: &str) -> Result<(), DeliveryError>;
}
