//! Registration entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Registration;
use sqlx::FromRow;

/// Column list shared by every query returning a full registration row.
pub const REGISTRATION_COLUMNS: &str = "id, emp_code, prefix_name, first_name, last_name, full_name, \
     full_name_eng, position_name, level_name, level_code, section_name, department_name, \
     exam_date, registration_timestamp, registration_datetime, confirmed_data, confirmed_exam, \
     status, sequence_number, phone_number, user_type, user_role, gender, created_at";

/// Database row mapping for the exam_proctor_registrations table.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationEntity {
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
    pub created_at: DateTime<Utc>,
}

impl From<RegistrationEntity> for Registration {
    fn from(entity: RegistrationEntity) -> Self {
        Self {
            id: entity.id,
            emp_code: entity.emp_code,
            prefix_name: entity.prefix_name,
            first_name: entity.first_name,
            last_name: entity.last_name,
            full_name: entity.full_name,
            full_name_eng: entity.full_name_eng,
            position_name: entity.position_name,
            level_name: entity.level_name,
            level_code: entity.level_code,
            section_name: entity.section_name,
            department_name: entity.department_name,
            exam_date: entity.exam_date,
            registration_timestamp: entity.registration_timestamp,
            registration_datetime: entity.registration_datetime,
            confirmed_data: entity.confirmed_data,
            confirmed_exam: entity.confirmed_exam,
            status: entity.status,
            sequence_number: entity.sequence_number,
            phone_number: entity.phone_number,
            user_type: entity.user_type,
            user_role: entity.user_role,
            gender: entity.gender,
            created_at: entity.created_at,
        }
    }
}
