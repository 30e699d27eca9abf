//! SMTP mail transport.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use super::{MailTransport, OutgoingMail};
use crate::error::DeliveryError;
use crate::notification::channels::EmailConfig;
use crate::{Error, Result};

/// Mail transport backed by an SMTP relay.
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpMailTransport {
    /// Build the transport from channel configuration.
    ///
    /// No connection is opened here; the relay is contacted on first send.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        if config.smtp_host.trim().is_empty() {
            return Err(Error::config("SMTP host is not configured"));
        }

        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host).map_err(
                |e| Error::config(format!("Invalid SMTP relay {}: {}", config.smtp_host, e)),
            )?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
        };

        builder = builder
            .port(config.smtp_port)
            .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if let Some((username, password)) = config.credentials() {
            builder = builder.credentials(Credentials::new(
                username.to_string(),
                password.to_string(),
            ));
        }

        Ok(Self {
            mailer: builder.build(),
            host: config.smtp_host.clone(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, mail: &OutgoingMail) -> std::result::Result<(), DeliveryError> {
        let from: Mailbox = mail
            .from
            .parse()
            .map_err(|e| DeliveryError::transport(format!("Invalid sender {}: {}", mail.from, e)))?;
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| DeliveryError::invalid_address(format!("{}: {}", mail.to, e)))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| DeliveryError::transport(format!("Failed to build email: {}", e)))?;

        self.mailer.send(email).await.map_err(|e| {
            DeliveryError::transport(format!("SMTP delivery via {} failed: {}", self.host, e))
        })?;

        debug!(relay = %self.host, to = %mail.to, "Email handed to SMTP relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_host() {
        let config = EmailConfig {
            smtp_host: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            SmtpMailTransport::new(&config),
            Err(Error::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_plaintext_relay_builds() {
        let config = EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            use_tls: false,
            ..Default::default()
        };
        assert!(SmtpMailTransport::new(&config).is_ok());
    }
}
