//! Service layer module.

pub mod alerting;

pub use alerting::{AlertService, ClassifiedReading, ReminderReport};
