//! Twilio REST API SMS gateway.
//!
//! Sends messages via `POST /2010-04-01/Accounts/{sid}/Messages.json` with
//! HTTP basic auth and a form-encoded body. Any 2xx status counts as
//! accepted; everything else is reported with the provider's response body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::SmsGateway;
use crate::error::DeliveryError;
use crate::notification::channels::SmsConfig;
use crate::utils::http_client::install_rustls_provider;
use crate::{Error, Result};

/// Maximum response body length echoed into an error.
const ERROR_BODY_LIMIT: usize = 512;

/// SMS gateway backed by the Twilio Messages API.
pub struct TwilioGateway {
    client: Client,
    messages_url: String,
    account_sid: String,
    auth_token: String,
    messaging_service_sid: String,
}

impl TwilioGateway {
    /// Build the gateway. Fails if any credential is missing.
    pub fn new(config: &SmsConfig) -> Result<Self> {
        let (account_sid, auth_token, messaging_service_sid) = config
            .credentials()
            .ok_or_else(|| Error::config("Twilio credentials are not configured"))?;

        if !account_sid.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::config("Twilio account SID must be alphanumeric"));
        }

        install_rustls_provider();
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let messages_url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            config.api_base_url.trim_end_matches('/'),
            account_sid
        );

        Ok(Self {
            client,
            messages_url,
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            messaging_service_sid: messaging_service_sid.to_string(),
        })
    }
}

#[async_trait]
impl SmsGateway for TwilioGateway {
    async fn submit(&self, to: &str, body: &str) -> std::result::Result<(), DeliveryError> {
        let form = [
            ("To", to),
            ("MessagingServiceSid", self.messaging_service_sid.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(&self.messages_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| DeliveryError::transport(format!("SMS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            warn!("SMS provider rejected message: {} - {}", status, body);
            return Err(DeliveryError::transport(format!(
                "SMS provider returned {}: {}",
                status, body
            )));
        }

        debug!(%status, "SMS accepted by provider");
        Ok(())
    }
}
