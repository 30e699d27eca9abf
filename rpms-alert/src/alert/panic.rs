//! Patient-initiated panic alert.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::User;
use crate::notification::{AlertDispatcher, AlertMessage, DispatchOutcome};
use crate::{Error, Result};

/// Live session of the treating clinician.
///
/// Called synchronously after the panic alert has been dispatched.
pub trait ClinicianSession: Send + Sync {
    fn receive_alert(&self, doctor: &User, message: &AlertMessage);
}

/// Session that only records the alert in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSession;

impl ClinicianSession for LoggingSession {
    fn receive_alert(&self, doctor: &User, message: &AlertMessage) {
        info!(
            doctor = %doctor.id,
            alert_id = %message.id,
            "Panic alert delivered to clinician session: {}",
            message.text
        );
    }
}

/// Result of a panic trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanicOutcome {
    pub message: AlertMessage,
    pub outcome: DispatchOutcome,
}

/// Emergency alert raised by the patient, bypassing threshold evaluation.
pub struct PanicButton {
    patient: Option<User>,
    doctor: Option<User>,
    dispatcher: AlertDispatcher,
    recipients: Vec<String>,
    session: Arc<dyn ClinicianSession>,
}

impl PanicButton {
    pub fn new(
        dispatcher: AlertDispatcher,
        recipients: Vec<String>,
        session: Arc<dyn ClinicianSession>,
    ) -> Self {
        Self {
            patient: None,
            doctor: None,
            dispatcher,
            recipients,
            session,
        }
    }

    pub fn with_patient(mut self, patient: User) -> Self {
        self.patient = Some(patient);
        self
    }

    pub fn with_doctor(mut self, doctor: User) -> Self {
        self.doctor = Some(doctor);
        self
    }

    /// Dispatch the panic alert, then notify the clinician session.
    pub async fn trigger(&self) -> Result<PanicOutcome> {
        self.fire(None).await
    }

    /// Like [`trigger`](Self::trigger), with a free-text note from the
    /// patient appended to the message.
    pub async fn trigger_with(&self, note: &str) -> Result<PanicOutcome> {
        self.fire(Some(note)).await
    }

    async fn fire(&self, note: Option<&str>) -> Result<PanicOutcome> {
        let patient = self
            .patient
            .as_ref()
            .ok_or_else(|| Error::missing_context("no patient set"))?;
        let doctor = self
            .doctor
            .as_ref()
            .ok_or_else(|| Error::missing_context("no treating doctor set"))?;

        let mut text = format!("Emergency! Patient {} needs immediate attention.", patient.id);
        if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
            text.push_str(" Note: ");
            text.push_str(note);
        }
        let message = AlertMessage::emergency(&patient.id, text);

        let outcome = self.dispatcher.dispatch(&message, &self.recipients).await?;
        self.session.receive_alert(doctor, &message);

        info!(
            patient = %patient.id,
            doctor = %doctor.id,
            delivered = outcome.delivered.len(),
            failed = outcome.failed.len(),
            "Panic alert raised"
        );

        Ok(PanicOutcome { message, outcome })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::test_support::{doctor, patient};
    use crate::notification::dispatcher::tests::TestChannel;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSession {
        received: Mutex<Vec<(String, String)>>,
    }

    impl ClinicianSession for RecordingSession {
        fn receive_alert(&self, doctor: &User, message: &AlertMessage) {
            self.received
                .lock()
                .unwrap()
                .push((doctor.id.clone(), message.text.clone()));
        }
    }

    fn button(
        channel: &Arc<TestChannel>,
        session: &Arc<RecordingSession>,
        recipients: &[&str],
    ) -> PanicButton {
        PanicButton::new(
            AlertDispatcher::new(channel.clone()),
            recipients.iter().map(|r| r.to_string()).collect(),
            session.clone(),
        )
    }

    #[tokio::test]
    async fn test_trigger_dispatches_and_notifies_session() {
        let channel = Arc::new(TestChannel::default());
        let session = Arc::new(RecordingSession::default());
        let button = button(&channel, &session, &["grace@clinic.example"])
            .with_patient(patient("P001"))
            .with_doctor(doctor("D001"));

        let result = button.trigger().await.unwrap();

        assert_eq!(
            result.message.text,
            "Emergency! Patient P001 needs immediate attention."
        );
        assert!(result.outcome.is_success());
        assert_eq!(channel.call_count(), 1);

        let received = session.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0, "D001");
    }

    #[tokio::test]
    async fn test_trigger_with_note() {
        let channel = Arc::new(TestChannel::default());
        let session = Arc::new(RecordingSession::default());
        let button = button(&channel, &session, &["grace@clinic.example"])
            .with_patient(patient("P001"))
            .with_doctor(doctor("D001"));

        let result = button.trigger_with("chest pain").await.unwrap();
        assert_eq!(
            result.message.text,
            "Emergency! Patient P001 needs immediate attention. Note: chest pain"
        );

        let result = button.trigger_with("  ").await.unwrap();
        assert!(!result.message.text.contains("Note:"));
    }

    #[tokio::test]
    async fn test_missing_doctor() {
        let channel = Arc::new(TestChannel::default());
        let session = Arc::new(RecordingSession::default());
        let button =
            button(&channel, &session, &["grace@clinic.example"]).with_patient(patient("P001"));

        assert!(matches!(
            button.trigger().await,
            Err(Error::MissingContext(_))
        ));
        assert_eq!(channel.call_count(), 0);
        assert!(session.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_misconfigured_skips_callback() {
        let channel = Arc::new(TestChannel::default());
        let session = Arc::new(RecordingSession::default());
        let button = button(&channel, &session, &[])
            .with_patient(patient("P001"))
            .with_doctor(doctor("D001"));

        assert!(matches!(
            button.trigger().await,
            Err(Error::MisconfiguredDispatcher(_))
        ));
        assert!(session.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delivery_still_notifies_session() {
        let channel = Arc::new(TestChannel::failing(&["grace@clinic.example"]));
        let session = Arc::new(RecordingSession::default());
        let button = button(&channel, &session, &["grace@clinic.example"])
            .with_patient(patient("P001"))
            .with_doctor(doctor("D001"));

        let result = button.trigger().await.unwrap();
        assert!(!result.outcome.is_success());
        assert_eq!(session.received.lock().unwrap().len(), 1);
    }
}
