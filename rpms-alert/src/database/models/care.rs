//! Appointment and prescription database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::parse_datetime;
use crate::Result;
use crate::notification::ReminderEvent;

/// Appointment status as stored in `appointments.status`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Canceled,
}

/// An `appointments` row joined with the doctor's name.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AppointmentDbModel {
    pub appointment_id: i64,
    /// `YYYY-MM-DD HH:MM:SS`
    pub appointment_time: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub status: String,
}

impl AppointmentDbModel {
    pub fn status(&self) -> Option<AppointmentStatus> {
        self.status.parse().ok()
    }

    /// Reminder event announcing this appointment to the patient.
    pub fn to_event(&self) -> Result<ReminderEvent> {
        Ok(ReminderEvent::AppointmentCreated {
            appointment_id: self.appointment_id,
            patient_id: self.patient_id.clone(),
            doctor_name: self.doctor_name.clone(),
            scheduled_for: parse_datetime("appointment_time", &self.appointment_time)?,
        })
    }
}

/// A `prescriptions` row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PrescriptionDbModel {
    pub prescription_id: i64,
    pub patient_id: String,
    pub medication: String,
    pub dosage: String,
    pub schedule: String,
}

impl PrescriptionDbModel {
    pub fn to_event(&self) -> ReminderEvent {
        ReminderEvent::PrescriptionIssued {
            prescription_id: self.prescription_id,
            patient_id: self.patient_id.clone(),
            medication: self.medication.clone(),
            dosage: self.dosage.clone(),
            schedule: self.schedule.clone(),
        }
    }
}
