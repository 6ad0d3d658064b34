//! Registration domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A committed registration (one row per employee code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Registration {
    pub id: i64,
    pub emp_code: String,
    pub prefix_name: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub full_name_eng: String,
    pub position_name: String,
    pub level_name: String,
    pub level_code: String,
    pub section_name: String,
    pub department_name: String,
    pub exam_date: String,
    /// Client-supplied submission instant, epoch milliseconds.
    pub registration_timestamp: i64,
    /// Client-supplied submission datetime, truncated to millisecond precision.
    pub registration_datetime: String,
    pub confirmed_data: bool,
    pub confirmed_exam: bool,
    pub status: String,
    pub sequence_number: String,
    pub phone_number: String,
    pub user_type: String,
    pub user_role: String,
    pub gender: String,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Whether the row belongs to an administrator (excluded from capacity).
    pub fn is_admin(&self) -> bool {
        self.user_role == "admin"
    }
}

/// A fully derived registration ready to be written to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub emp_code: String,
    pub prefix_name: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub full_name_eng: String,
    pub position_name: String,
    pub level_name: String,
    pub level_code: String,
    pub section_name: String,
    pub department_name: String,
    pub exam_date: String,
    pub registration_timestamp: i64,
    pub registration_datetime: String,
    pub confirmed_data: bool,
    pub confirmed_exam: bool,
    pub status: String,
    pub sequence_number: String,
    pub phone_number: String,
    pub user_type: String,
    pub user_role: String,
    pub gender: String,
}

impl NewRegistration {
    /// Materializes the committed row once the ledger has assigned an id.
    pub fn into_registration(self, id: i64, created_at: DateTime<Utc>) -> Registration {
        Registration {
            id,
            emp_code: self.emp_code,
            prefix_name: self.prefix_name,
            first_name: self.first_name,
            last_name: self.last_name,
            full_name: self.full_name,
            full_name_eng: self.full_name_eng,
            position_name: self.position_name,
            level_name: self.level_name,
            level_code: self.level_code,
            section_name: self.section_name,
            department_name: self.department_name,
            exam_date: self.exam_date,
            registration_timestamp: self.registration_timestamp,
            registration_datetime: self.registration_datetime,
            confirmed_data: self.confirmed_data,
            confirmed_exam: self.confirmed_exam,
            status: self.status,
            sequence_number: self.sequence_number,
            phone_number: self.phone_number,
            user_type: self.user_type,
            user_role: self.user_role,
            gender: self.gender,
            created_at,
        }
    }
}

/// Raw submission values after alias resolution, before any validation.
///
/// Optional fields are `None` when the client did not send them; the gate
/// fills them from derivation rules or configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationCandidate {
    pub emp_code: String,
    pub registration_timestamp: String,
    pub registration_datetime: String,
    pub confirmed_data: bool,
    pub confirmed_exam: bool,
    pub prefix_name: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub full_name_eng: String,
    pub position_name: String,
    pub level_name: String,
    pub level_code: String,
    pub section_name: String,
    pub department_name: String,
    pub phone_number: String,
    pub user_type: String,
    pub exam_date: Option<String>,
    pub sequence_number: Option<String>,
    pub user_role: Option<String>,
    pub gender: Option<String>,
    pub status: Option<String>,
}

/// Successful admission result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdmissionReceipt {
    pub registration_id: i64,
    pub queue_number: i64,
    pub sequence_number: String,
    pub phone_number: String,
    pub user_type: String,
    pub user_role: String,
    pub level_name: String,
    pub level_code: String,
    pub gender: String,
}

/// A stored registration together with its current queue number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegistrationDetail {
    pub registration: Registration,
    pub queue_number: i64,
}


#[cfg(test)]
mod tests {
    use super::fixtures::new_registration;
    use super::*;

    #[test]
    fn test_into_registration_keeps_fields() {
        let now = Utc::now();
        let reg = new_registration("653004", "2568-12-07", 1_700_000_000_000, "user")
            .into_registration(7, now);
        assert_eq!(reg.id, 7);
        assert_eq!(reg.emp_code, "653004");
        assert_eq!(reg.registration_timestamp, 1_700_000_000_000);
        assert_eq!(reg.created_at, now);
        assert!(!reg.is_admin());
    }

    #[test]
    fn test_registration_is_admin() {
        let reg = new_registration("1", "d", 1, "admin").into_registration(1, Utc::now());
        assert!(reg.is_admin());
    }

    #[test]
    fn test_receipt_serialization_snake_case() {
        let receipt = AdmissionReceipt {
            registration_id: 1,
            queue_number: 1,
            sequence_number: "00400000".into(),
            phone_number: String::new(),
            user_type: "employee".into(),
            user_role: "user".into(),
            level_name: String::new(),
            level_code: String::new(),
            gender: "ไม่ระบุ".into(),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["registration_id"], 1);
        assert_eq!(json["queue_number"], 1);
        assert_eq!(json["sequence_number"], "00400000");
    }
}
