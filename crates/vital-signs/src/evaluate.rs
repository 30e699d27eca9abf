use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{Metric, NormalRangeTable, ReadingError, VitalReading};

/// Result of classifying a reading against a range table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "violations", rename_all = "snake_case")]
pub enum Verdict {
    Normal,
    /// Exactly the metrics that fell outside their range.
    Abnormal(BTreeSet<Metric>),
}

impl Verdict {
    pub fn is_abnormal(&self) -> bool {
        matches!(self, Self::Abnormal(_))
    }

    pub fn violations(&self) -> Option<&BTreeSet<Metric>> {
        match self {
            Self::Normal => None,
            Self::Abnormal(metrics) => Some(metrics),
        }
    }
}

/// Classify `reading` against `ranges`.
///
/// Fails if the subject is empty or any metric is NaN or infinite; no
/// metric is compared until all four have been checked.
pub fn evaluate(reading: &VitalReading, ranges: &NormalRangeTable) -> Result<Verdict, ReadingError> {
    if reading.subject_id().trim().is_empty() {
        return Err(ReadingError::MissingSubject);
    }

    for metric in Metric::iter() {
        let value = reading.value(metric);
        if !value.is_finite() {
            return Err(ReadingError::NonFinite { metric, value });
        }
    }

    let violations: BTreeSet<Metric> = Metric::iter()
        .filter(|metric| !ranges.contains(*metric, reading.value(*metric)))
        .collect();

    if violations.is_empty() {
        Ok(Verdict::Normal)
    } else {
        Ok(Verdict::Abnormal(violations))
    }
}
