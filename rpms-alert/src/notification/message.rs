//! Outbound alert message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of an outbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Reminders and other routine notices.
    Info,
    /// Abnormal vitals and panic alerts.
    Emergency,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Emergency => write!(f, "emergency"),
        }
    }
}

/// A message about one subject, built for a single dispatch and never
/// persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    /// Correlation id for logs.
    pub id: Uuid,
    pub subject_id: String,
    pub text: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl AlertMessage {
    pub fn new(subject_id: impl Into<String>, text: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id: subject_id.into(),
            text: text.into(),
            severity,
            created_at: Utc::now(),
        }
    }

    pub fn emergency(subject_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(subject_id, text, Severity::Emergency)
    }

    pub fn info(subject_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(subject_id, text, Severity::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Emergency);
        assert_eq!(Severity::Emergency.to_string(), "emergency");
    }

    #[test]
    fn test_constructors() {
        let msg = AlertMessage::emergency("P001", "Emergency!");
        assert_eq!(msg.severity, Severity::Emergency);
        assert_eq!(msg.subject_id, "P001");

        let other = AlertMessage::info("P001", "Reminder");
        assert_eq!(other.severity, Severity::Info);
        assert_ne!(msg.id, other.id);
    }
}
