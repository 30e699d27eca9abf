//! Email notification channel using SMTP.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::NotificationChannel;
use crate::domain::AddressKind;
use crate::error::DeliveryError;
use crate::notification::message::{AlertMessage, Severity};
use crate::notification::transport::{MailTransport, OutgoingMail};

/// `local@domain.tld` with no whitespace and a single `@`.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern is valid")
});

/// Email channel configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP server host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: Option<String>,
    /// SMTP password. Supplied through the environment, never committed.
    #[serde(default, skip_serializing)]
    pub smtp_password: Option<String>,
    /// Use STARTTLS.
    #[serde(default = "default_true")]
    pub use_tls: bool,
    /// Sender email address. Falls back to the SMTP username.
    #[serde(default)]
    pub from_address: String,
    /// Connection and command timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            use_tls: true,
            from_address: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl EmailConfig {
    /// Username and password, when both are present.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.smtp_username.as_deref(), self.smtp_password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// Address used in the `From` header.
    pub fn sender(&self) -> Option<&str> {
        let from = self.from_address.trim();
        if !from.is_empty() {
            return Some(from);
        }
        self.smtp_username
            .as_deref()
            .map(str::trim)
            .filter(|user| user.contains('@'))
    }
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("has_password", &self.smtp_password.is_some())
            .field("use_tls", &self.use_tls)
            .field("from_address", &self.from_address)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Check that `address` looks like a deliverable email address.
pub(crate) fn validate_email_address(address: &str) -> Result<(), DeliveryError> {
    if address.trim().is_empty() {
        return Err(DeliveryError::invalid_address("email recipient is empty"));
    }
    if !EMAIL_REGEX.is_match(address) {
        return Err(DeliveryError::invalid_address(format!(
            "{} is not a valid email address",
            address
        )));
    }
    Ok(())
}

/// Email notification channel.
pub struct EmailChannel {
    config: EmailConfig,
    transport: Arc<dyn MailTransport>,
}

impl EmailChannel {
    /// Create a new Email channel over `transport`.
    pub fn new(config: EmailConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { config, transport }
    }

    /// Build the email subject.
    fn build_subject(&self, message: &AlertMessage) -> String {
        match message.severity {
            Severity::Info => "RPMS Notification".to_string(),
            Severity::Emergency => "RPMS Emergency Alert".to_string(),
        }
    }

    /// Build the email body (plain text).
    fn build_body(&self, message: &AlertMessage) -> String {
        format!(
            "{}\n\nPatient: {}\nSeverity: {}\nTime: {}",
            message.text,
            message.subject_id,
            message.severity,
            message.created_at.to_rfc3339()
        )
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn channel_type(&self) -> &'static str {
        "email"
    }

    fn address_kind(&self) -> AddressKind {
        AddressKind::Email
    }

    fn requires_credentials(&self) -> bool {
        true
    }

    fn validate_address(&self, recipient: &str) -> Result<(), DeliveryError> {
        validate_email_address(recipient)
    }

    async fn send(&self, message: &AlertMessage, recipient: &str) -> Result<(), DeliveryError> {
        self.validate_address(recipient)?;

        let from = self
            .config
            .sender()
            .ok_or_else(|| DeliveryError::transport("no sender address configured"))?;

        let mail = OutgoingMail {
            from: from.to_string(),
            to: recipient.to_string(),
            subject: self.build_subject(message),
            body: self.build_body(message),
        };

        self.transport.deliver(&mail).await?;

        debug!(alert_id = %message.id, "Email notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<OutgoingMail>>,
        fail_with: Option<DeliveryError>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn deliver(&self, mail: &OutgoingMail) -> Result<(), DeliveryError> {
            self.sent.lock().unwrap().push(mail.clone());
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    fn config() -> EmailConfig {
        EmailConfig {
            from_address: "alerts@clinic.example".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_port, 587);
        assert!(config.use_tls);
        assert!(config.credentials().is_none());
        assert!(config.sender().is_none());
    }

    #[test]
    fn test_channel_identity() {
        let channel = EmailChannel::new(config(), Arc::new(RecordingTransport::default()));
        assert_eq!(channel.channel_type(), "email");
        assert_eq!(channel.address_kind(), AddressKind::Email);
        assert!(channel.requires_credentials());
    }

    #[test]
    fn test_sender_falls_back_to_username() {
        let config = EmailConfig {
            smtp_username: Some("rpms@clinic.example".to_string()),
            ..Default::default()
        };
        assert_eq!(config.sender(), Some("rpms@clinic.example"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = EmailConfig {
            smtp_username: Some("rpms".to_string()),
            smtp_password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("has_password: true"));
    }

    #[test]
    fn test_validate_email_address() {
        assert!(validate_email_address("grace@clinic.example").is_ok());
        assert!(validate_email_address("").is_err());
        assert!(validate_email_address("grace").is_err());
        assert!(validate_email_address("grace@clinic").is_err());
        assert!(validate_email_address("grace hopper@clinic.example").is_err());
        assert!(validate_email_address("a@b@clinic.example").is_err());
    }

    #[tokio::test]
    async fn test_send_builds_mail() {
        let transport = Arc::new(RecordingTransport::default());
        let channel = EmailChannel::new(config(), transport.clone());

        let message = AlertMessage::emergency("P001", "Alert! Patient P001's vitals are abnormal");
        channel.send(&message, "grace@clinic.example").await.unwrap();

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "grace@clinic.example");
        assert_eq!(sent[0].from, "alerts@clinic.example");
        assert_eq!(sent[0].subject, "RPMS Emergency Alert");
        assert!(sent[0].body.starts_with("Alert! Patient P001's vitals are abnormal"));
    }

    #[tokio::test]
    async fn test_invalid_address_skips_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let channel = EmailChannel::new(config(), transport.clone());

        let message = AlertMessage::info("P001", "Reminder");
        let err = channel.send(&message, "not-an-address").await.unwrap_err();

        assert!(matches!(err, DeliveryError::InvalidAddress(_)));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let transport = Arc::new(RecordingTransport {
            fail_with: Some(DeliveryError::transport("535 authentication failed")),
            ..Default::default()
        });
        let channel = EmailChannel::new(config(), transport);

        let message = AlertMessage::info("P001", "Reminder");
        let err = channel
            .send(&message, "grace@clinic.example")
            .await
            .unwrap_err();
        assert_eq!(err, DeliveryError::transport("535 authentication failed"));
    }

    #[tokio::test]
    async fn test_missing_sender_is_transport_error() {
        let transport = Arc::new(RecordingTransport::default());
        let channel = EmailChannel::new(EmailConfig::default(), transport.clone());

        let message = AlertMessage::info("P001", "Reminder");
        let err = channel
            .send(&message, "grace@clinic.example")
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
