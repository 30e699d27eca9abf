//! Alert service.
//!
//! Resolves patients, readings and treating doctors from the repositories
//! and runs the alerting core against them. Alerts go to the treating
//! doctor; reminders go to the patient.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use vital_signs::{NormalRangeTable, Verdict, VitalReading, evaluate};

use crate::alert::{AlertOutcome, ClinicianSession, EmergencyAlert, PanicButton, PanicOutcome};
use crate::database::models::AppointmentStatus;
use crate::database::repositories::{
    CareRepository, SqlxCareRepository, SqlxUserRepository, SqlxVitalsRepository, UserRepository,
    VitalsRepository,
};
use crate::domain::{AddressKind, User};
use crate::notification::{
    AlertDispatcher, DispatchOutcome, FailedDelivery, NotificationChannel, ReminderEvent,
    ReminderScheduler,
};
use crate::{Error, Result};

/// A stored reading with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedReading {
    pub reading: VitalReading,
    pub verdict: Verdict,
}

/// Result of sending one reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderReport {
    pub event: ReminderEvent,
    pub outcome: DispatchOutcome,
}

/// Application-level entry point for alerts and reminders.
pub struct AlertService {
    users: Arc<dyn UserRepository>,
    vitals: Arc<dyn VitalsRepository>,
    care: Arc<dyn CareRepository>,
    ranges: Arc<NormalRangeTable>,
    dispatcher: AlertDispatcher,
    reminders: ReminderScheduler,
    session: Arc<dyn ClinicianSession>,
}

impl AlertService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        vitals: Arc<dyn VitalsRepository>,
        care: Arc<dyn CareRepository>,
        ranges: Arc<NormalRangeTable>,
        channel: Arc<dyn NotificationChannel>,
        session: Arc<dyn ClinicianSession>,
    ) -> Self {
        Self {
            users,
            vitals,
            care,
            ranges,
            dispatcher: AlertDispatcher::new(channel.clone()),
            reminders: ReminderScheduler::new(channel),
            session,
        }
    }

    /// Build the service over SQLx repositories sharing `pool`.
    pub fn from_pool(
        pool: SqlitePool,
        ranges: Arc<NormalRangeTable>,
        channel: Arc<dyn NotificationChannel>,
        session: Arc<dyn ClinicianSession>,
    ) -> Self {
        Self::new(
            Arc::new(SqlxUserRepository::new(pool.clone())),
            Arc::new(SqlxVitalsRepository::new(pool.clone())),
            Arc::new(SqlxCareRepository::new(pool)),
            ranges,
            channel,
            session,
        )
    }

    /// Evaluate the patient's most recent reading and alert the treating
    /// doctor if it is abnormal.
    pub async fn check_latest_vitals(&self, patient_id: &str) -> Result<AlertOutcome> {
        let patient = self.load_patient(patient_id).await?;
        let reading = self
            .vitals
            .latest_for_patient(patient_id)
            .await?
            .ok_or_else(|| {
                Error::missing_context(format!("patient {} has no vital readings", patient_id))
            })?
            .to_reading()?;

        self.run_alert(patient, reading).await
    }

    /// Evaluate a caller-supplied reading (manual entry) for the patient.
    pub async fn evaluate_reading(
        &self,
        patient_id: &str,
        reading: VitalReading,
    ) -> Result<AlertOutcome> {
        let patient = self.load_patient(patient_id).await?;
        self.run_alert(patient, reading).await
    }

    /// All stored readings for the patient, newest first, with verdicts.
    pub async fn reading_history(&self, patient_id: &str) -> Result<Vec<ClassifiedReading>> {
        self.load_patient(patient_id).await?;

        let rows = self.vitals.list_for_patient(patient_id).await?;
        rows.iter()
            .map(|row| -> Result<ClassifiedReading> {
                let reading = row.to_reading()?;
                let verdict = evaluate(&reading, &self.ranges)?;
                Ok(ClassifiedReading { reading, verdict })
            })
            .collect()
    }

    /// Raise a panic alert to the patient's treating doctor.
    pub async fn panic(&self, patient_id: &str, note: Option<&str>) -> Result<PanicOutcome> {
        let patient = self.load_patient(patient_id).await?;
        let doctor = self.treating_doctor(patient_id).await?;
        let recipients = self.recipients_for(&doctor)?;

        let button = PanicButton::new(self.dispatcher.clone(), recipients, self.session.clone())
            .with_patient(patient)
            .with_doctor(doctor);

        match note {
            Some(note) => button.trigger_with(note).await,
            None => button.trigger().await,
        }
    }

    /// Remind the patient of an upcoming appointment.
    pub async fn remind_appointment(&self, appointment_id: i64) -> Result<ReminderReport> {
        let appointment = self.care.get_appointment(appointment_id).await?;
        if appointment.status() == Some(AppointmentStatus::Canceled) {
            return Err(Error::validation(format!(
                "appointment {} is canceled",
                appointment_id
            )));
        }
        let event = appointment.to_event()?;
        self.send_reminder(event).await
    }

    /// Remind the patient of a prescription's schedule.
    pub async fn remind_prescription(&self, prescription_id: i64) -> Result<ReminderReport> {
        let prescription = self.care.get_prescription(prescription_id).await?;
        self.send_reminder(prescription.to_event()).await
    }

    async fn send_reminder(&self, event: ReminderEvent) -> Result<ReminderReport> {
        let patient = self.load_patient(event.patient_id()).await?;
        let kind = self.reminders.address_kind();
        let recipient = patient.contact(kind).ok_or_else(|| {
            Error::missing_context(format!(
                "patient {} has no {} on record",
                patient.id,
                address_label(kind)
            ))
        })?;
        self.reminders.check_recipient(recipient)?;

        let mut outcome = DispatchOutcome::default();
        match self.reminders.remind(&event, recipient).await {
            Ok(()) => outcome.delivered.push(recipient.to_string()),
            Err(error) => outcome.failed.push(FailedDelivery {
                address: recipient.to_string(),
                error,
            }),
        }

        Ok(ReminderReport { event, outcome })
    }

    async fn run_alert(&self, patient: User, reading: VitalReading) -> Result<AlertOutcome> {
        debug!(patient = %patient.id, reading = %reading, "Evaluating vital reading");

        let patient_id = patient.id.clone();
        let mut alert = EmergencyAlert::new(self.dispatcher.clone(), self.ranges.clone())
            .with_patient(patient)
            .with_reading(reading);

        // The treating doctor is only looked up once the reading is abnormal.
        let outcome = alert
            .check_and_trigger_with(|| self.doctor_recipients(&patient_id))
            .await?;
        if let Some(dispatch) = outcome.dispatch_outcome()
            && !dispatch.is_success()
        {
            info!(
                patient = %patient_id,
                failed = dispatch.failed.len(),
                "Abnormal vitals alert was not delivered to every recipient"
            );
        }
        Ok(outcome)
    }

    /// Address of the patient's treating doctor for the bound channel.
    async fn doctor_recipients(&self, patient_id: &str) -> Result<Vec<String>> {
        let doctor = self.treating_doctor(patient_id).await?;
        debug!(patient = %patient_id, doctor = %doctor.id, "Resolved treating doctor");
        self.recipients_for(&doctor)
    }

    async fn load_patient(&self, patient_id: &str) -> Result<User> {
        let user = self.users.get_user(patient_id).await?.into_domain()?;
        if !user.is_patient() {
            return Err(Error::validation(format!(
                "user {} is a {}, not a patient",
                user.id,
                user.role.as_str()
            )));
        }
        Ok(user)
    }

    async fn treating_doctor(&self, patient_id: &str) -> Result<User> {
        self.users
            .get_treating_doctor(patient_id)
            .await?
            .into_domain()
    }

    /// The doctor's address for the bound channel.
    fn recipients_for(&self, doctor: &User) -> Result<Vec<String>> {
        let kind = self
            .dispatcher
            .address_kind()
            .ok_or_else(|| Error::misconfigured("no notification channel bound"))?;

        let address = doctor.contact(kind).ok_or_else(|| {
            Error::missing_context(format!(
                "doctor {} has no {} on record",
                doctor.id,
                address_label(kind)
            ))
        })?;
        Ok(vec![address.to_string()])
    }
}

fn address_label(kind: AddressKind) -> &'static str {
    match kind {
        AddressKind::Email => "email address",
        AddressKind::Phone => "phone number",
    }
}
