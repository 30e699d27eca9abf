//! Application-wide error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vital_signs::{RangeError, ReadingError};

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-wide error type.
///
/// Everything here is reported to the caller before any message leaves the
/// process, or stops a call outright. Per-recipient delivery problems are
/// values of [`DeliveryError`] collected into a dispatch outcome instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidReading(#[from] ReadingError),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Notification dispatcher misconfigured: {0}")]
    MisconfiguredDispatcher(String),

    #[error("Missing alert context: {0}")]
    MissingContext(String),

    #[error("Invalid state transition: cannot transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    DatabaseSqlx(#[from] sqlx::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn missing_context(msg: impl Into<String>) -> Self {
        Self::MissingContext(msg.into())
    }

    pub fn misconfigured(msg: impl Into<String>) -> Self {
        Self::MisconfiguredDispatcher(msg.into())
    }
}

impl From<RangeError> for Error {
    fn from(err: RangeError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Failure to deliver one message to one recipient.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DeliveryError {
    /// The address was rejected before any network I/O.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The transport (SMTP relay, SMS provider) failed or timed out.
    #[error("transport error: {0}")]
    Transport(String),
}

impl DeliveryError {
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }
}
