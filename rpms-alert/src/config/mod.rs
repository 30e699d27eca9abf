//! Application configuration.
//!
//! Settings come from an optional TOML file and are then overlaid with
//! environment variables. Secrets (SMTP password, Twilio auth token) are
//! expected to arrive through the environment only.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use vital_signs::NormalRangeTable;

use crate::logging::DEFAULT_LOG_FILTER;
use crate::notification::{ChannelKind, EmailConfig, SmsConfig};
use crate::{Error, Result};

/// Default SQLite database location.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:rpms.db?mode=rwc";

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Directory for daily log files. Console only when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Emit console logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            dir: None,
            json: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Channel alerts and reminders are delivered through.
    #[serde(default)]
    pub channel: ChannelKind,
    #[serde(default)]
    pub ranges: NormalRangeTable,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub sms: SmsConfig,
    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            channel: ChannelKind::default(),
            ranges: NormalRangeTable::default(),
            email: EmailConfig::default(),
            sms: SmsConfig::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Parse a TOML file. Missing sections fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw)
            .map_err(|e| Error::config(format!("Invalid configuration in {}: {}", path.display(), e)))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::config(format!("Invalid configuration: {}", e)))
    }

    /// Load the file (if any) and overlay the process environment, after
    /// reading `.env`. Call [`validate`](Self::validate) once any command
    /// line overrides have been applied.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), "Loaded environment file");
        }

        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay values from `lookup`, typically the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| strip_quotes(&v)).filter(|v| !v.is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(filter) = get("RPMS_LOG_FILTER") {
            self.logging.filter = filter;
        }
        if let Some(dir) = get("RPMS_LOG_DIR") {
            self.logging.dir = Some(PathBuf::from(dir));
        }
        if let Some(json) = get("RPMS_LOG_JSON") {
            self.logging.json = matches!(json.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Some(host) = get("RPMS_SMTP_HOST") {
            self.email.smtp_host = host;
        }
        if let Some(port) = get("RPMS_SMTP_PORT") {
            self.email.smtp_port = port
                .parse()
                .map_err(|_| Error::config(format!("RPMS_SMTP_PORT is not a port: {}", port)))?;
        }
        if let Some(username) = get("RPMS_SMTP_USERNAME") {
            self.email.smtp_username = Some(username);
        }
        if let Some(password) = get("RPMS_SMTP_PASSWORD") {
            self.email.smtp_password = Some(password);
        }
        if let Some(from) = get("RPMS_SMTP_FROM") {
            self.email.from_address = from;
        }

        if let Some(sid) = get("TWILIO_ACCOUNT_SID") {
            self.sms.account_sid = Some(sid);
        }
        if let Some(token) = get("TWILIO_AUTH_TOKEN") {
            self.sms.auth_token = Some(token);
        }
        if let Some(service) = get("TWILIO_MESSAGING_SERVICE_SID") {
            self.sms.messaging_service_sid = Some(service);
        }

        Ok(())
    }

    /// Check the range table and the settings of the selected channel.
    pub fn validate(&self) -> Result<()> {
        self.ranges.validate()?;

        if self.database_url.trim().is_empty() {
            return Err(Error::config("database_url is empty"));
        }

        match self.channel {
            ChannelKind::Email => {
                if self.email.smtp_host.trim().is_empty() {
                    return Err(Error::config("email.smtp_host is empty"));
                }
                if self.email.smtp_port == 0 {
                    return Err(Error::config("email.smtp_port must be non-zero"));
                }
                if self.email.sender().is_none() {
                    return Err(Error::config(
                        "email.from_address is not set and the SMTP username is not an address",
                    ));
                }
            }
            ChannelKind::Sms => {
                if self.sms.credentials().is_none() {
                    return Err(Error::config(
                        "Twilio account SID, auth token and messaging service SID are required",
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Trim whitespace and one pair of surrounding double quotes.
fn strip_quotes(value: &str) -> String {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.channel, ChannelKind::Email);
        assert_eq!(config.ranges, NormalRangeTable::default());
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"AC123\""), "AC123");
        assert_eq!(strip_quotes("  token "), "token");
        assert_eq!(strip_quotes("\"unbalanced"), "\"unbalanced");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = AppConfig::from_toml(
            r#"
            channel = "sms"

            [ranges.heart_rate]
            min = 50.0
            max = 110.0

            [sms]
            account_sid = "AC123"
            messaging_service_sid = "MG456"
            "#,
        )
        .unwrap();

        assert_eq!(config.channel, ChannelKind::Sms);
        assert_eq!(config.ranges.heart_rate.max, 110.0);
        assert_eq!(config.ranges.oxygen_level.min, 95.0);
        assert_eq!(config.sms.account_sid.as_deref(), Some("AC123"));
        assert!(config.sms.auth_token.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml("channel = \"pager\""),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "database_url = \"sqlite::memory:\"").unwrap();
        writeln!(file, "[email]").unwrap();
        writeln!(file, "from_address = \"alerts@clinic.example\"").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.email.from_address, "alerts@clinic.example");
        config.validate().unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_apply_env_overlay() {
        let vars = env(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("RPMS_SMTP_PORT", "2525"),
            ("RPMS_SMTP_PASSWORD", "\"s3cret\""),
            ("TWILIO_ACCOUNT_SID", "\"AC123\""),
            ("TWILIO_AUTH_TOKEN", "tok"),
            ("TWILIO_MESSAGING_SERVICE_SID", "MG456"),
            ("RPMS_LOG_DIR", ""),
            ("RPMS_LOG_JSON", "true"),
        ]);

        let mut config = AppConfig::default();
        config.apply_env(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.email.smtp_port, 2525);
        assert_eq!(config.email.smtp_password.as_deref(), Some("s3cret"));
        assert_eq!(
            config.sms.credentials(),
            Some(("AC123", "tok", "MG456"))
        );
        assert!(config.logging.dir.is_none());
        assert!(config.logging.json);
    }

    #[test]
    fn test_apply_env_bad_port() {
        let vars = env(&[("RPMS_SMTP_PORT", "smtp")]);
        let mut config = AppConfig::default();
        assert!(config.apply_env(|k| vars.get(k).cloned()).is_err());
    }

    #[test]
    fn test_validate_channel_settings() {
        // No sender configured
        assert!(AppConfig::default().validate().is_err());

        let mut config = AppConfig {
            channel: ChannelKind::Sms,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let vars = env(&[
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "tok"),
            ("TWILIO_MESSAGING_SERVICE_SID", "MG456"),
        ]);
        config.apply_env(|k| vars.get(k).cloned()).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let mut config = AppConfig::default();
        config.email.from_address = "alerts@clinic.example".to_string();
        config.ranges.heart_rate.min = 120.0;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_serialized_config_omits_secrets() {
        let mut config = AppConfig::default();
        config.email.smtp_password = Some("s3cret".to_string());
        config.sms.auth_token = Some("tok3n".to_string());

        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("tok3n"));
    }
}
