//! SMS notification channel.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::NotificationChannel;
use crate::domain::AddressKind;
use crate::error::DeliveryError;
use crate::notification::message::AlertMessage;
use crate::notification::transport::SmsGateway;

/// `+` followed by at least ten digits.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\d{10,}$").expect("phone pattern is valid"));

/// Provider limit for a single (concatenated) message body.
const SMS_BODY_LIMIT: usize = 1600;

/// SMS channel configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    /// Twilio account SID.
    #[serde(default)]
    pub account_sid: Option<String>,
    /// Twilio auth token. Supplied through the environment, never committed.
    #[serde(default, skip_serializing)]
    pub auth_token: Option<String>,
    /// Twilio messaging service SID.
    #[serde(default)]
    pub messaging_service_sid: Option<String>,
    /// REST API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            messaging_service_sid: None,
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl SmsConfig {
    /// Account SID, auth token and messaging service SID, when all are set.
    pub fn credentials(&self) -> Option<(&str, &str, &str)> {
        Some((
            non_empty(&self.account_sid)?,
            non_empty(&self.auth_token)?,
            non_empty(&self.messaging_service_sid)?,
        ))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl std::fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsConfig")
            .field("account_sid", &self.account_sid)
            .field("has_auth_token", &self.auth_token.is_some())
            .field("messaging_service_sid", &self.messaging_service_sid)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Check that `number` is an E.164-style phone number.
pub(crate) fn validate_phone_number(number: &str) -> Result<(), DeliveryError> {
    if PHONE_REGEX.is_match(number) {
        Ok(())
    } else {
        Err(DeliveryError::invalid_address(format!(
            "{} is not an E.164 phone number (e.g. +14155550100)",
            number
        )))
    }
}

/// SMS notification channel.
pub struct SmsChannel {
    gateway: Arc<dyn SmsGateway>,
}

impl SmsChannel {
    /// Create a new SMS channel over `gateway`.
    pub fn new(gateway: Arc<dyn SmsGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    fn channel_type(&self) -> &'static str {
        "sms"
    }

    fn address_kind(&self) -> AddressKind {
        AddressKind::Phone
    }

    fn requires_credentials(&self) -> bool {
        true
    }

    fn validate_address(&self, recipient: &str) -> Result<(), DeliveryError> {
        validate_phone_number(recipient)
    }

    async fn send(&self, message: &AlertMessage, recipient: &str) -> Result<(), DeliveryError> {
        self.validate_address(recipient)?;

        let body = truncate_message(&message.text, SMS_BODY_LIMIT);
        self.gateway.submit(recipient, &body).await?;

        debug!(alert_id = %message.id, "SMS notification sent");
        Ok(())
    }
}

/// Truncate a message to fit within the provider's character limit.
fn truncate_message(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let suffix = " [truncated]";
    let budget = limit - suffix.len();
    let truncated: String = text.chars().take(budget).collect();
    format!("{truncated}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingGateway {
        calls: AtomicU32,
        fail: bool,
    }

    #[async_trait]
    impl SmsGateway for CountingGateway {
        async fn submit(&self, _to: &str, _body: &str) -> Result<(), DeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(DeliveryError::transport("SMS provider returned 500"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_sms_config_credentials() {
        assert!(SmsConfig::default().credentials().is_none());

        let config = SmsConfig {
            account_sid: Some("AC1".to_string()),
            auth_token: Some("tok".to_string()),
            messaging_service_sid: Some("".to_string()),
            ..Default::default()
        };
        assert!(config.credentials().is_none());

        let config = SmsConfig {
            messaging_service_sid: Some("MG456".to_string()),
            ..config
        };
        assert_eq!(config.credentials(), Some(("AC1", "tok", "MG456")));

        let config = SmsConfig {
            auth_token: Some("  ".to_string()),
            ..config
        };
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_channel_identity() {
        let channel = SmsChannel::new(Arc::new(CountingGateway::default()));
        assert_eq!(channel.channel_type(), "sms");
        assert_eq!(channel.address_kind(), AddressKind::Phone);
        assert!(channel.requires_credentials());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = SmsConfig {
            auth_token: Some("c8873126secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("c8873126secret"));
    }

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("+14155550100").is_ok());
        assert!(validate_phone_number("+1234567890").is_ok());
        assert!(validate_phone_number("12345").is_err());
        assert!(validate_phone_number("14155550100").is_err());
        assert!(validate_phone_number("+123456789").is_err());
        assert!(validate_phone_number("+1 415 555 0100").is_err());
    }

    #[tokio::test]
    async fn test_malformed_number_never_reaches_gateway() {
        let gateway = Arc::new(CountingGateway::default());
        let channel = SmsChannel::new(gateway.clone());

        let message = AlertMessage::emergency("P001", "Emergency!");
        let err = channel.send(&message, "12345").await.unwrap_err();

        assert!(matches!(err, DeliveryError::InvalidAddress(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_number_proceeds_to_gateway() {
        let gateway = Arc::new(CountingGateway::default());
        let channel = SmsChannel::new(gateway.clone());

        let message = AlertMessage::emergency("P001", "Emergency!");
        channel.send(&message, "+14155550100").await.unwrap();

        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gateway_failure_is_transport_error() {
        let gateway = Arc::new(CountingGateway {
            fail: true,
            ..Default::default()
        });
        let channel = SmsChannel::new(gateway);

        let message = AlertMessage::emergency("P001", "Emergency!");
        let err = channel.send(&message, "+14155550100").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Transport(_)));
    }

    #[test]
    fn test_truncate_message() {
        assert_eq!(truncate_message("hello", 100), "hello");

        let long = "a".repeat(2000);
        let truncated = truncate_message(&long, SMS_BODY_LIMIT);
        assert!(truncated.chars().count() <= SMS_BODY_LIMIT);
        assert!(truncated.ends_with("[truncated]"));
    }
}
