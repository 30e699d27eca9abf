//! # Vital Signs
//!
//! Data model for patient vital-sign readings and the normal-range
//! threshold evaluation used by the alerting pipeline.
//!
//! ## Features
//!
//! - Immutable `VitalReading` covering heart rate, blood pressure, body
//!   temperature and oxygen saturation
//! - `NormalRangeTable` with inclusive bounds (oxygen is lower-bound only)
//! - Pure `evaluate` function producing a `Verdict`
//!
//! Evaluation touches only its arguments, so a shared `NormalRangeTable`
//! can be read from any number of threads without locking.

mod error;
mod evaluate;
mod metric;
mod range;
mod reading;

pub use error::{RangeError, ReadingError};
pub use evaluate::{Verdict, evaluate};
pub use metric::Metric;
pub use range::{BoundedRange, LowerBound, NormalRangeTable};
pub use reading::VitalReading;
