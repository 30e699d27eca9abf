//! rpms-alert library crate.
//!
//! Vital-sign threshold alerting and notification dispatch for remote
//! patient monitoring: readings are classified against normal ranges,
//! abnormal readings and panic presses alert the treating doctor, and
//! routine reminders go to patients, over email or SMS.

pub mod alert;
pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod logging;
pub mod notification;
pub mod services;
pub mod utils;

pub use error::{DeliveryError, Error, Result};
