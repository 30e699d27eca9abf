//! User entity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Kind of contact address a notification channel delivers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Email,
    Phone,
}

/// Role-specific data of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    Patient {
        birth_date: NaiveDate,
        admission_date: Option<NaiveDate>,
    },
    Doctor {
        joining_date: NaiveDate,
        specialization: String,
    },
    Administrator {
        joining_date: NaiveDate,
    },
}

impl Role {
    /// Role name as stored in the `users.role` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient { .. } => "patient",
            Self::Doctor { .. } => "doctor",
            Self::Administrator { .. } => "administrator",
        }
    }
}

/// A patient, doctor or administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Phone number, E.164 when SMS delivery is expected.
    pub phone: String,
    pub email: String,
    pub gender: String,
    #[serde(flatten)]
    pub role: Role,
}

impl User {
    pub fn is_patient(&self) -> bool {
        matches!(self.role, Role::Patient { .. })
    }

    pub fn is_doctor(&self) -> bool {
        matches!(self.role, Role::Doctor { .. })
    }

    /// Contact address for `kind`, if one is on record.
    pub fn contact(&self, kind: AddressKind) -> Option<&str> {
        let address = match kind {
            AddressKind::Email => self.email.trim(),
            AddressKind::Phone => self.phone.trim(),
        };
        (!address.is_empty()).then_some(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor() -> User {
        User {
            id: "D001".to_string(),
            name: "Grace Hopper".to_string(),
            phone: "+14155550100".to_string(),
            email: " grace@clinic.example ".to_string(),
            gender: "F".to_string(),
            role: Role::Doctor {
                joining_date: NaiveDate::from_ymd_opt(2020, 1, 6).unwrap(),
                specialization: "Cardiology".to_string(),
            },
        }
    }

    #[test]
    fn test_contact_by_kind() {
        let user = doctor();
        assert_eq!(user.contact(AddressKind::Email), Some("grace@clinic.example"));
        assert_eq!(user.contact(AddressKind::Phone), Some("+14155550100"));
    }

    #[test]
    fn test_missing_contact() {
        let user = User {
            phone: "   ".to_string(),
            ..doctor()
        };
        assert_eq!(user.contact(AddressKind::Phone), None);
    }

    #[test]
    fn test_role_checks() {
        let user = doctor();
        assert!(user.is_doctor());
        assert!(!user.is_patient());
        assert_eq!(user.role.as_str(), "doctor");
    }

    #[test]
    fn test_serialization_flattens_role() {
        let json = serde_json::to_value(doctor()).unwrap();
        assert_eq!(json["role"], "doctor");
        assert_eq!(json["specialization"], "Cardiology");
    }
}
