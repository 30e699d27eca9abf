//! Vital reading database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vital_signs::VitalReading;

use super::parse_date;
use crate::Result;

/// A `vitals` row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct VitalsDbModel {
    pub vital_id: i64,
    pub patient_id: String,
    /// `YYYY-MM-DD`
    pub checkup_date: String,
    pub heart_rate: f64,
    pub blood_pressure: f64,
    pub body_temperature: f64,
    pub oxygen_level: f64,
}

impl VitalsDbModel {
    pub fn to_reading(&self) -> Result<VitalReading> {
        Ok(VitalReading::new(
            self.patient_id.clone(),
            self.heart_rate,
            self.blood_pressure,
            self.body_temperature,
            self.oxygen_level,
            parse_date("checkup_date", &self.checkup_date)?,
        ))
    }
}
