//! Domain error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::registration::RegistrationDetail;

/// Message returned when the employee has not confirmed both statements.
pub const CONFIRMATION_REQUIRED_MESSAGE: &str =
    "กรุณายืนยันข้อมูลและการปฏิบัติหน้าที่ก่อนลงทะเบียน";

/// Message returned when the level code is outside the allow-list.
pub const INELIGIBLE_LEVEL_MESSAGE: &str =
    "คุณสมบัติไม่ผ่านเกณฑ์: ไม่อยู่ในระดับการศึกษาที่กำหนด";

/// Message returned before the window opens.
pub const WINDOW_NOT_OPEN_MESSAGE: &str = "ระบบยังไม่เปิดให้ลงทะเบียน";

/// Message returned after the window closes.
pub const WINDOW_CLOSED_MESSAGE: &str = "ระบบปิดรับลงทะเบียนแล้ว";

/// Errors raised by storage backends (ledger and window store).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Connection or query failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Terminal outcomes of a rejected registration attempt.
#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("{}", WINDOW_NOT_OPEN_MESSAGE)]
    WindowNotYetOpen { opens_at: DateTime<Utc> },

    #[error("{}", WINDOW_CLOSED_MESSAGE)]
    WindowClosed { closes_at: DateTime<Utc> },

    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),

    #[error("Invalid field: {0}")]
    InvalidField(&'static str),

    #[error("{}", CONFIRMATION_REQUIRED_MESSAGE)]
    ConfirmationRequired,

    #[error("{}", INELIGIBLE_LEVEL_MESSAGE)]
    IneligibleLevel(String),

    /// The identity already holds a registration. Carries the stored record
    /// and its queue number so callers can answer with the original result.
    #[error("Already registered")]
    AlreadyRegistered(Box<RegistrationDetail>),

    #[error("Registration capacity has been reached")]
    CapacityExceeded { registered: i64, capacity: i64 },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl AdmissionError {
    /// Short machine-readable outcome, used for metric labels and logs.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::WindowNotYetOpen { .. } => "window_not_open",
            Self::WindowClosed { .. } => "window_closed",
            Self::MissingFields(_) => "missing_fields",
            Self::InvalidField(_) => "invalid_field",
            Self::ConfirmationRequired => "confirmation_required",
            Self::IneligibleLevel(_) => "ineligible_level",
            Self::AlreadyRegistered(_) => "already_registered",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::Storage(_) => "storage_error",
        }
    }
}

impl From<StoreError> for AdmissionError {
    fn from(err: StoreError) -> Self {
        AdmissionError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::Conflict("emp_code".into()).to_string(),
            "Conflict: emp_code"
        );
        assert_eq!(
            StoreError::Storage("connection refused".into()).to_string(),
            "Storage error: connection refused"
        );
    }

    #[test]
    fn test_admission_error_messages() {
        assert_eq!(
            AdmissionError::MissingFields(vec!["emp_code"]).to_string(),
            "Missing required fields"
        );
        assert_eq!(
            AdmissionError::ConfirmationRequired.to_string(),
            CONFIRMATION_REQUIRED_MESSAGE
        );
        assert_eq!(
            AdmissionError::IneligibleLevel("99".into()).to_string(),
            INELIGIBLE_LEVEL_MESSAGE
        );
        assert_eq!(
            AdmissionError::WindowClosed {
                closes_at: Utc::now()
            }
            .to_string(),
            WINDOW_CLOSED_MESSAGE
        );
    }

    #[test]
    fn test_admission_error_outcome() {
        assert_eq!(AdmissionError::ConfirmationRequired.outcome(), "confirmation_required");
        assert_eq!(
            AdmissionError::CapacityExceeded {
                registered: 10,
                capacity: 10
            }
            .outcome(),
            "capacity_exceeded"
        );
    }

    #[test]
    fn test_store_error_into_admission_error() {
        let err: AdmissionError = StoreError::Storage("boom".into()).into();
        assert!(matches!(err, AdmissionError::Storage(msg) if msg.contains("boom")));
    }
}
