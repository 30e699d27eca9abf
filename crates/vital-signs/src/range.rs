use serde::{Deserialize, Serialize};

use crate::{Metric, RangeError};

/// Inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundedRange {
    pub min: f64,
    pub max: f64,
}

impl BoundedRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, metric: Metric) -> Result<(), RangeError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(RangeError::NonFinite { metric });
        }
        if self.min > self.max {
            return Err(RangeError::Inverted {
                metric,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Inclusive lower bound with no upper limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LowerBound {
    pub min: f64,
}

impl LowerBound {
    pub const fn new(min: f64) -> Self {
        Self { min }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min
    }
}

/// Per-metric normal ranges.
///
/// Oxygen saturation only has a lower bound: high saturation is never
/// abnormal on its own, so the table has no way to express an upper one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalRangeTable {
    #[serde(default = "default_heart_rate")]
    pub heart_rate: BoundedRange,
    #[serde(default = "default_blood_pressure")]
    pub blood_pressure: BoundedRange,
    #[serde(default = "default_body_temperature")]
    pub body_temperature: BoundedRange,
    #[serde(default = "default_oxygen_level")]
    pub oxygen_level: LowerBound,
}

fn default_heart_rate() -> BoundedRange {
    BoundedRange::new(60.0, 100.0)
}

fn default_blood_pressure() -> BoundedRange {
    BoundedRange::new(90.0, 140.0)
}

fn default_body_temperature() -> BoundedRange {
    BoundedRange::new(36.1, 37.2)
}

fn default_oxygen_level() -> LowerBound {
    LowerBound::new(95.0)
}

impl Default for NormalRangeTable {
    fn default() -> Self {
        Self {
            heart_rate: default_heart_rate(),
            blood_pressure: default_blood_pressure(),
            body_temperature: default_body_temperature(),
            oxygen_level: default_oxygen_level(),
        }
    }
}

impl NormalRangeTable {
    /// Check every bound is finite and no range is inverted.
    pub fn validate(&self) -> Result<(), RangeError> {
        self.heart_rate.validate(Metric::HeartRate)?;
        self.blood_pressure.validate(Metric::BloodPressure)?;
        self.body_temperature.validate(Metric::BodyTemperature)?;
        if !self.oxygen_level.min.is_finite() {
            return Err(RangeError::NonFinite {
                metric: Metric::OxygenLevel,
            });
        }
        Ok(())
    }

    /// Whether `value` lies inside the normal range for `metric`.
    pub fn contains(&self, metric: Metric, value: f64) -> bool {
        match metric {
            Metric::HeartRate => self.heart_rate.contains(value),
            Metric::BloodPressure => self.blood_pressure.contains(value),
            Metric::BodyTemperature => self.body_temperature.contains(value),
            Metric::OxygenLevel => self.oxygen_level.contains(value),
        }
    }

    /// Lower bound and optional upper bound for `metric`.
    pub fn bounds(&self, metric: Metric) -> (f64, Option<f64>) {
        match metric {
            Metric::HeartRate => (self.heart_rate.min, Some(self.heart_rate.max)),
            Metric::BloodPressure => (self.blood_pressure.min, Some(self.blood_pressure.max)),
            Metric::BodyTemperature => {
                (self.body_temperature.min, Some(self.body_temperature.max))
            }
            Metric::OxygenLevel => (self.oxygen_level.min, None),
        }
    }
}
