//! Vitals repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::Result;
use crate::database::models::VitalsDbModel;

/// Vitals repository trait.
#[async_trait]
pub trait VitalsRepository: Send + Sync {
    /// All readings for a patient, newest first.
    async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<VitalsDbModel>>;
    async fn latest_for_patient(&self, patient_id: &str) -> Result<Option<VitalsDbModel>>;
}

/// SQLx implementation of VitalsRepository.
pub struct SqlxVitalsRepository {
    pool: SqlitePool,
}

impl SqlxVitalsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VitalsRepository for SqlxVitalsRepository {
    async fn list_for_patient(&self, patient_id: &str) -> Result<Vec<VitalsDbModel>> {
        let rows = sqlx::query_as::<_, VitalsDbModel>(
            "SELECT * FROM vitals WHERE patient_id = ? ORDER BY checkup_date DESC, vital_id DESC",
        )
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn latest_for_patient(&self, patient_id: &str) -> Result<Option<VitalsDbModel>> {
        let row = sqlx::query_as::<_, VitalsDbModel>(
            r#"
            SELECT * FROM vitals
            WHERE patient_id = ?
            ORDER BY checkup_date DESC, vital_id DESC
            LIMIT 1
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
