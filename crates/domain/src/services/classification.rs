//! Classification heuristics for registrants.
//!
//! All functions here are pure and total: any input string yields a result.

use serde::{Deserialize, Serialize};

/// Label stored for an unknown gender and used as the sentinel for empty
/// labels in grouped statistics.
pub const UNSPECIFIED_LABEL: &str = "ไม่ระบุ";

/// Default user type when none is supplied.
pub const DEFAULT_USER_TYPE: &str = "employee";

/// Admin-indicating substrings used when none are configured.
pub const DEFAULT_ADMIN_MARKERS: &[&str] = &["admin", "administrator", "ผู้ดูแล"];

/// Prefixes read as male. Matched case-insensitively at the start.
const MALE_PREFIXES: &[&str] = &["นาย", "mr"];

/// Prefixes read as female. Checked before the male list so that "Mrs" is
/// not swallowed by "Mr".
const FEMALE_PREFIXES: &[&str] = &["นาง", "mrs", "ms"];

/// Gender derived from a name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Gender {
    /// Label persisted in the ledger.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "ชาย",
            Gender::Female => "หญิง",
            Gender::Unspecified => UNSPECIFIED_LABEL,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a name prefix. "นางสาว" is covered by "นาง".
pub fn derive_gender(prefix: &str) -> Gender {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Gender::Unspecified;
    }
    if FEMALE_PREFIXES.iter().any(|p| prefix.starts_with(p)) {
        return Gender::Female;
    }
    if MALE_PREFIXES.iter().any(|p| prefix.starts_with(p)) {
        return Gender::Male;
    }
    Gender::Unspecified
}

/// Lower-cases and trims a user type, defaulting to `employee`.
pub fn normalize_user_type(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        DEFAULT_USER_TYPE.to_string()
    } else {
        value.to_lowercase()
    }
}

/// Role of a registrant. Admins do not consume proctor slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured set of admin-indicating substrings (lower-cased).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMarkers(Vec<String>);

impl RoleMarkers {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = markers
            .into_iter()
            .map(|m| m.as_ref().trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        Self(markers)
    }

    /// Whether `text` contains any marker, case-insensitively.
    pub fn indicates_admin(&self, text: &str) -> bool {
        let text = text.trim().to_lowercase();
        !text.is_empty() && self.0.iter().any(|m| text.contains(m.as_str()))
    }
}

impl Default for RoleMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_MARKERS)
    }
}

/// Resolves a registrant's role.
///
/// An explicit, non-blank role wins; otherwise the role is inferred from the
/// user type.
pub fn resolve_user_role(explicit: Option<&str>, user_type: &str, markers: &RoleMarkers) -> UserRole {
    let source = match explicit.map(str::trim) {
        Some(role) if !role.is_empty() => role,
        _ => user_type,
    };

    if markers.indicates_admin(source) {
        UserRole::Admin
    } else {
        UserRole::User
    }
}

/// Whether a caller may use admin-only endpoints: an admin-like role, an
/// admin-like user type, or an allow-listed employee code.
pub fn is_admin_caller(
    role: &str,
    user_type: &str,
    emp_code: &str,
    markers: &RoleMarkers,
    admin_emp_codes: &[String],
) -> bool {
    let emp_code = emp_code.trim();
    markers.indicates_admin(role)
        || markers.indicates_admin(user_type)
        || (!emp_code.is_empty() && admin_emp_codes.iter().any(|c| c == emp_code))
}
