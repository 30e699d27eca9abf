//! User repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::UserDbModel;
use crate::{Error, Result};

/// Columns of a user joined with its role tables.
const USER_COLUMNS: &str = r#"
    u.user_id, u.name, u.contact_info, u.gender, u.role, u.email,
    p.birth_date, p.admission_date,
    COALESCE(d.joining_date, a.joining_date) AS joining_date,
    d.specialization
"#;

const ROLE_JOINS: &str = r#"
    LEFT JOIN patients p ON p.user_id = u.user_id
    LEFT JOIN doctors d ON d.user_id = u.user_id
    LEFT JOIN administrators a ON a.user_id = u.user_id
"#;

/// User repository trait.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: &str) -> Result<UserDbModel>;

    /// Doctor of the patient's most recent appointment that was not canceled.
    async fn get_treating_doctor(&self, patient_id: &str) -> Result<UserDbModel>;
}

/// SQLx implementation of UserRepository.
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn get_user(&self, id: &str) -> Result<UserDbModel> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users u {ROLE_JOINS} WHERE u.user_id = ?"
        );
        sqlx::query_as::<_, UserDbModel>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::not_found("User", id))
    }

    async fn get_treating_doctor(&self, patient_id: &str) -> Result<UserDbModel> {
        let query = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM appointments ap
            JOIN users u ON u.user_id = ap.doctor_id
            {ROLE_JOINS}
            WHERE ap.patient_id = ? AND ap.status != 'canceled'
            ORDER BY ap.appointment_time DESC, ap.appointment_id DESC
            LIMIT 1
            "#
        );
        sqlx::query_as::<_, UserDbModel>(&query)
            .bind(patient_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::not_found("TreatingDoctor", patient_id))
    }
}
