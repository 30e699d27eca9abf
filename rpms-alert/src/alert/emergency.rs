//! Threshold-driven emergency alert for one vital reading.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info};
use vital_signs::{Metric, NormalRangeTable, Verdict, VitalReading, evaluate};

use super::state::AlertState;
use crate::domain::User;
use crate::notification::{AlertDispatcher, AlertMessage, DispatchOutcome};
use crate::{Error, Result};

/// Result of running an emergency alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AlertOutcome {
    /// Every metric was in range; nothing was sent.
    Suppressed,
    /// The reading was abnormal and the alert went out.
    Dispatched {
        violations: BTreeSet<Metric>,
        message: AlertMessage,
        outcome: DispatchOutcome,
    },
}

impl AlertOutcome {
    pub fn dispatch_outcome(&self) -> Option<&DispatchOutcome> {
        match self {
            Self::Suppressed => None,
            Self::Dispatched { outcome, .. } => Some(outcome),
        }
    }
}

/// Evaluates one reading for one patient and alerts the recipients once if
/// it is abnormal.
pub struct EmergencyAlert {
    patient: Option<User>,
    reading: Option<VitalReading>,
    dispatcher: AlertDispatcher,
    ranges: Arc<NormalRangeTable>,
    recipients: Vec<String>,
    state: AlertState,
    verdict: Option<Verdict>,
}

impl EmergencyAlert {
    pub fn new(dispatcher: AlertDispatcher, ranges: Arc<NormalRangeTable>) -> Self {
        Self {
            patient: None,
            reading: None,
            dispatcher,
            ranges,
            recipients: Vec::new(),
            state: AlertState::Idle,
            verdict: None,
        }
    }

    pub fn with_recipients(mut self, recipients: Vec<String>) -> Self {
        self.recipients = recipients;
        self
    }

    pub fn with_patient(mut self, patient: User) -> Self {
        self.patient = Some(patient);
        self
    }

    pub fn with_reading(mut self, reading: VitalReading) -> Self {
        self.reading = Some(reading);
        self
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    /// Verdict of the last evaluation, if one ran.
    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// Evaluate the reading and dispatch an alert if it is abnormal.
    ///
    /// Runs at most once: after the alert is dispatched or suppressed,
    /// further calls fail with [`Error::InvalidStateTransition`]. When the
    /// dispatcher rejects its configuration the alert stays evaluated and
    /// may be run again.
    pub async fn check_and_trigger(&mut self) -> Result<AlertOutcome> {
        let recipients = self.recipients.clone();
        self.check_and_trigger_with(|| async move { Ok::<_, Error>(recipients) })
            .await
    }

    /// Like [`check_and_trigger`](Self::check_and_trigger), but the
    /// recipients are resolved by `resolve` only once the reading is known
    /// to be abnormal. A resolver error leaves the alert evaluated.
    pub async fn check_and_trigger_with<F, Fut>(&mut self, resolve: F) -> Result<AlertOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<String>>>,
    {
        let evaluated = self.state.transition_to(AlertState::Evaluated)?;

        let patient = self
            .patient
            .as_ref()
            .ok_or_else(|| Error::missing_context("no patient set"))?;
        let reading = self
            .reading
            .as_ref()
            .ok_or_else(|| Error::missing_context("no vital reading set"))?;

        if !patient.is_patient() {
            return Err(Error::validation(format!(
                "user {} is a {}, not a patient",
                patient.id,
                patient.role.as_str()
            )));
        }
        if reading.subject_id() != patient.id {
            return Err(Error::validation(format!(
                "reading belongs to {}, not patient {}",
                reading.subject_id(),
                patient.id
            )));
        }

        let verdict = evaluate(reading, &self.ranges)?;
        self.state = evaluated;
        self.verdict = Some(verdict.clone());

        let violations = match verdict {
            Verdict::Normal => {
                self.state = self.state.transition_to(AlertState::Suppressed)?;
                debug!(patient = %patient.id, "Vitals within normal ranges, alert suppressed");
                return Ok(AlertOutcome::Suppressed);
            }
            Verdict::Abnormal(violations) => violations,
        };

        let recipients = resolve().await?;
        let message = AlertMessage::emergency(&patient.id, abnormal_vitals_text(reading));
        let outcome = self.dispatcher.dispatch(&message, &recipients).await?;
        self.state = self.state.transition_to(AlertState::Dispatched)?;

        info!(
            patient = %patient.id,
            violations = ?violations,
            delivered = outcome.delivered.len(),
            failed = outcome.failed.len(),
            "Abnormal vitals alert dispatched"
        );

        Ok(AlertOutcome::Dispatched {
            violations,
            message,
            outcome,
        })
    }
}

fn abnormal_vitals_text(reading: &VitalReading) -> String {
    let values: Vec<String> = Metric::iter()
        .map(|metric| format!("{}={}", metric.label(), reading.value(metric)))
        .collect();
    format!(
        "Alert! Patient {}'s vitals are abnormal: {}",
        reading.subject_id(),
        values.join(", ")
    )
}
