//! User database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::parse_date;
use crate::domain::{Role, User};
use crate::{Error, Result};

/// A `users` row joined with its role table.
///
/// Role-specific columns are `NULL` for the roles that do not have them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserDbModel {
    pub user_id: String,
    pub name: String,
    /// Phone number
    pub contact_info: String,
    pub gender: String,
    /// One of `patient`, `doctor`, `administrator`
    pub role: String,
    pub email: String,
    pub birth_date: Option<String>,
    pub admission_date: Option<String>,
    pub joining_date: Option<String>,
    pub specialization: Option<String>,
}

impl UserDbModel {
    /// Convert the row into a domain user.
    pub fn into_domain(self) -> Result<User> {
        let required = |field: &str, value: Option<String>| {
            value.ok_or_else(|| {
                Error::Database(format!(
                    "{} {} has no {} on record",
                    self.role, self.user_id, field
                ))
            })
        };

        let role = match self.role.as_str() {
            "patient" => Role::Patient {
                birth_date: parse_date(
                    "birth_date",
                    &required("birth_date", self.birth_date.clone())?,
                )?,
                admission_date: self
                    .admission_date
                    .as_deref()
                    .filter(|d| !d.trim().is_empty())
                    .map(|d| parse_date("admission_date", d))
                    .transpose()?,
            },
            "doctor" => Role::Doctor {
                joining_date: parse_date(
                    "joining_date",
                    &required("joining_date", self.joining_date.clone())?,
                )?,
                specialization: self.specialization.clone().unwrap_or_default(),
            },
            "administrator" => Role::Administrator {
                joining_date: parse_date(
                    "joining_date",
                    &required("joining_date", self.joining_date.clone())?,
                )?,
            },
            other => {
                return Err(Error::Database(format!(
                    "user {} has unknown role '{}'",
                    self.user_id, other
                )));
            }
        };

        Ok(User {
            id: self.user_id,
            name: self.name,
            phone: self.contact_info,
            email: self.email,
            gender: self.gender,
            role,
        })
    }
}
