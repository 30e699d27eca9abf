use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// One of the four monitored vital-sign metrics.
///
/// Ordering follows the order in which metrics appear in alert messages.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Beats per minute.
    HeartRate,
    /// Systolic pressure in mmHg.
    BloodPressure,
    /// Degrees Celsius.
    BodyTemperature,
    /// Oxygen saturation in percent.
    OxygenLevel,
}

impl Metric {
    /// Short label used in alert message templates.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HeartRate => "HR",
            Self::BloodPressure => "BP",
            Self::BodyTemperature => "Temp",
            Self::OxygenLevel => "O2",
        }
    }
}
