//! Common validation utilities.

use validator::ValidationError;

/// Level codes eligible for proctor duty unless configured otherwise.
pub const DEFAULT_ALLOWED_LEVEL_CODES: &[&str] = &["40", "50", "60", "70", "80", "90"];

/// Returns true if the value is empty or whitespace only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validates a level code against an allow-list.
///
/// An empty code means "not supplied" and always passes; eligibility is only
/// enforced when the profile actually carries a level.
pub fn validate_level_code<S: AsRef<str>>(code: &str, allowed: &[S]) -> Result<(), ValidationError> {
    let code = code.trim();
    if code.is_empty() || allowed.iter().any(|a| a.as_ref() == code) {
        return Ok(());
    }

    let mut err = ValidationError::new("level_code_not_allowed");
    err.message = Some(format!("Level code {} is not eligible", code).into());
    Err(err)
}

/// Validates that a registration timestamp is a positive epoch millisecond value.
pub fn validate_registration_timestamp(timestamp_millis: i64) -> Result<(), ValidationError> {
    if timestamp_millis > 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("timestamp_invalid");
        err.message = Some("Registration timestamp must be a positive epoch value".into());
        Err(err)
    }
}
