//! Appointment and prescription repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::{AppointmentDbModel, PrescriptionDbModel};
use crate::{Error, Result};

/// Care repository trait.
#[async_trait]
pub trait CareRepository: Send + Sync {
    async fn get_appointment(&self, id: i64) -> Result<AppointmentDbModel>;
    async fn get_prescription(&self, id: i64) -> Result<PrescriptionDbModel>;
}

/// SQLx implementation of CareRepository.
pub struct SqlxCareRepository {
    pool: SqlitePool,
}

impl SqlxCareRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CareRepository for SqlxCareRepository {
    async fn get_appointment(&self, id: i64) -> Result<AppointmentDbModel> {
        sqlx::query_as::<_, AppointmentDbModel>(
            r#"
            SELECT ap.appointment_id, ap.appointment_time, ap.patient_id, ap.doctor_id,
                   u.name AS doctor_name, ap.status
            FROM appointments ap
            JOIN users u ON u.user_id = ap.doctor_id
            WHERE ap.appointment_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Appointment", id.to_string()))
    }

    async fn get_prescription(&self, id: i64) -> Result<PrescriptionDbModel> {
        sqlx::query_as::<_, PrescriptionDbModel>(
            "SELECT * FROM prescriptions WHERE prescription_id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::not_found("Prescription", id.to_string()))
    }
}
