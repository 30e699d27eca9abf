//! Reminder events.
//!
//! Domain events that turn into a single routine notification for the
//! patient they concern.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::message::AlertMessage;

/// Events that can trigger a reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReminderEvent {
    /// An appointment was booked for the patient.
    AppointmentCreated {
        appointment_id: i64,
        patient_id: String,
        doctor_name: String,
        scheduled_for: NaiveDateTime,
    },
    /// A doctor issued a prescription to the patient.
    PrescriptionIssued {
        prescription_id: i64,
        patient_id: String,
        medication: String,
        dosage: String,
        schedule: String,
    },
}

impl ReminderEvent {
    /// Get the event type as a string.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AppointmentCreated { .. } => "appointment_created",
            Self::PrescriptionIssued { .. } => "prescription_issued",
        }
    }

    /// Patient the reminder is about.
    pub fn patient_id(&self) -> &str {
        match self {
            Self::AppointmentCreated { patient_id, .. }
            | Self::PrescriptionIssued { patient_id, .. } => patient_id,
        }
    }

    /// Reminder text sent to the patient.
    pub fn message(&self) -> String {
        match self {
            Self::AppointmentCreated {
                doctor_name,
                scheduled_for,
                ..
            } => format!(
                "Reminder: Appointment with Dr. {} on {}",
                doctor_name,
                scheduled_for.format("%Y-%m-%d %H:%M")
            ),
            Self::PrescriptionIssued {
                medication,
                dosage,
                schedule,
                ..
            } => format!(
                "Reminder: Take {} ({}) as per schedule: {}",
                medication, dosage, schedule
            ),
        }
    }

    /// Build the outbound message for this event.
    pub fn to_message(&self) -> AlertMessage {
        AlertMessage::info(self.patient_id(), self.message())
    }
}
