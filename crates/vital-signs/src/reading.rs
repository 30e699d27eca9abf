use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Metric;

/// A single set of vital-sign measurements for one subject.
///
/// Readings are produced by an ingestion collaborator (file upload or
/// manual entry) and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalReading {
    subject_id: String,
    heart_rate: f64,
    blood_pressure: f64,
    body_temperature: f64,
    oxygen_level: f64,
    observed_at: NaiveDate,
}

impl VitalReading {
    pub fn new(
        subject_id: impl Into<String>,
        heart_rate: f64,
        blood_pressure: f64,
        body_temperature: f64,
        oxygen_level: f64,
        observed_at: NaiveDate,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            heart_rate,
            blood_pressure,
            body_temperature,
            oxygen_level,
            observed_at,
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn heart_rate(&self) -> f64 {
        self.heart_rate
    }

    pub fn blood_pressure(&self) -> f64 {
        self.blood_pressure
    }

    pub fn body_temperature(&self) -> f64 {
        self.body_temperature
    }

    pub fn oxygen_level(&self) -> f64 {
        self.oxygen_level
    }

    pub fn observed_at(&self) -> NaiveDate {
        self.observed_at
    }

    /// Value of a single metric.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::HeartRate => self.heart_rate,
            Metric::BloodPressure => self.blood_pressure,
            Metric::BodyTemperature => self.body_temperature,
            Metric::OxygenLevel => self.oxygen_level,
        }
    }
}

impl std::fmt::Display for VitalReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} on {}: HR={}, BP={}, Temp={}, O2={}",
            self.subject_id,
            self.observed_at,
            self.heart_rate,
            self.blood_pressure,
            self.body_temperature,
            self.oxygen_level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_by_metric() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let reading = VitalReading::new("P001", 72.0, 118.0, 36.6, 97.0, date);

        assert_eq!(reading.value(Metric::HeartRate), 72.0);
        assert_eq!(reading.value(Metric::BloodPressure), 118.0);
        assert_eq!(reading.value(Metric::BodyTemperature), 36.6);
        assert_eq!(reading.value(Metric::OxygenLevel), 97.0);
        assert_eq!(reading.subject_id(), "P001");
    }

    #[test]
    fn test_display() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let reading = VitalReading::new("P001", 110.0, 120.0, 36.8, 98.0, date);
        assert_eq!(
            reading.to_string(),
            "P001 on 2026-03-01: HR=110, BP=120, Temp=36.8, O2=98"
        );
    }
}
