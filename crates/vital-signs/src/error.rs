use thiserror::Error;

use crate::Metric;

/// A reading that cannot be classified.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadingError {
    #[error("Invalid reading: {metric} is not a finite number ({value})")]
    NonFinite { metric: Metric, value: f64 },

    #[error("Invalid reading: subject id is empty")]
    MissingSubject,
}

/// A normal-range table that cannot be used for evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Invalid range for {metric}: bound is not a finite number")]
    NonFinite { metric: Metric },

    #[error("Invalid range for {metric}: min {min} is greater than max {max}")]
    Inverted { metric: Metric, min: f64, max: f64 },
}
