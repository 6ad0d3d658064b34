//! Employee profile as returned by the HR login service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::services::classification::{
    derive_gender, normalize_user_type, RoleMarkers, UserRole,
};
use crate::services::payload::value_to_text;

/// Credentials forwarded to the HR login service.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Normalized employee profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmployeeProfile {
    pub emp_code: String,
    pub prefix_name: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub first_name_eng: String,
    pub last_name_eng: String,
    pub full_name_eng: String,
    pub position_name: String,
    pub level_name: String,
    pub level_code: String,
    pub section_name: String,
    pub department_name: String,
    pub phone: String,
    pub user_type: String,
    pub user_role: UserRole,
    pub gender: String,
}

/// Resolves the first present value among `(object, key)` sources.
fn pick(sources: &[(&Map<String, Value>, &str)]) -> String {
    sources
        .iter()
        .find_map(|(object, key)| match object.get(*key) {
            Some(Value::Null) | None => None,
            Some(value) => value_to_text(value),
        })
        .unwrap_or_default()
}

impl EmployeeProfile {
    /// Normalizes the `data` object of a successful login response.
    ///
    /// Values under `raw_data` take precedence over the flattened top-level
    /// keys. Returns `None` when `data` is not an object.
    pub fn from_login_data(data: &Value, markers: &RoleMarkers) -> Option<Self> {
        let data = data.as_object()?;
        let empty = Map::new();
        let raw = match data.get("raw_data") {
            Some(Value::Object(raw)) => raw,
            _ => &empty,
        };

        let prefix_name = pick(&[(raw, "PREFIX_NAME"), (data, "prefix_name")]);
        let first_name = pick(&[(raw, "FIRST_NAME"), (data, "first_name")]);
        let last_name = pick(&[(raw, "LAST_NAME"), (data, "last_name")]);
        let fallback_name = pick(&[(raw, "FULL_NAME"), (data, "full_name")]);
        let full_name = compose_full_name(&prefix_name, &first_name, &last_name, &fallback_name);

        let user_type = normalize_user_type(&pick(&[(raw, "USER_TYPE"), (data, "user_type")]));
        let role_text = pick(&[(raw, "USER_ROLE"), (data, "user_role")]);
        let user_role = if markers.indicates_admin(&role_text) || markers.indicates_admin(&user_type)
        {
            UserRole::Admin
        } else {
            UserRole::User
        };

        let gender = match pick(&[(raw, "GENDER")]) {
            g if !g.is_empty() => g,
            _ => derive_gender(&prefix_name).label().to_string(),
        };

        Some(Self {
            emp_code: pick(&[(raw, "EMP_CODE"), (data, "emp_code"), (data, "user_id")]),
            prefix_name,
            first_name,
            last_name,
            full_name,
            first_name_eng: pick(&[(raw, "FIRST_NAME_ENG")]),
            last_name_eng: pick(&[(raw, "LAST_NAME_ENG")]),
            full_name_eng: pick(&[(raw, "FULL_NAME_ENG")]),
            position_name: pick(&[(raw, "POSITION_NAME"), (raw, "POSITION")]),
            level_name: pick(&[(raw, "LEVEL_NAME"), (raw, "LEVEL")]),
            level_code: pick(&[(raw, "LEVEL_CODE"), (raw, "LEVEL_ID"), (data, "level_code")]),
            section_name: pick(&[(raw, "SECTION_NAME"), (raw, "SECTION")]),
            department_name: pick(&[(raw, "DEPARTMENT_NAME"), (data, "department_name")]),
            phone: pick(&[(raw, "PHONE"), (data, "phone")]),
            user_type,
            user_role,
            gender,
        })
    }
}

/// Joins the name parts with spaces. A prefix followed only by a first name is
/// glued to it. Falls back to `fallback` when every part is blank.
pub fn compose_full_name(prefix: &str, first: &str, last: &str, fallback: &str) -> String {
    let prefix = prefix.trim();
    let parts: Vec<&str> = [prefix, first.trim(), last.trim()]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        return fallback.trim().to_string();
    }

    let separator = if parts.len() == 2 && !prefix.is_empty() {
        ""
    } else {
        " "
    };
    parts.join(separator)
}

/// Login response body handed to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSession {
    pub user: EmployeeProfile,
    pub login_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl LoginSession {
    pub fn start(user: EmployeeProfile, now: DateTime<Utc>, lifetime_secs: i64) -> Self {
        Self {
            user,
            login_at: now,
            expires_at: now + Duration::seconds(lifetime_secs.max(0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compose_full_name() {
        assert_eq!(compose_full_name("นาย", "สมชาย", "ใจดี", ""), "นาย สมชาย ใจดี");
        assert_eq!(compose_full_name("นาย", "สมชาย", "", ""), "นายสมชาย");
        assert_eq!(compose_full_name("", "สมชาย", "ใจดี", ""), "สมชาย ใจดี");
        assert_eq!(compose_full_name(" ", " ", "", " fallback "), "fallback");
    }

    #[test]
    fn test_from_login_data_prefers_raw_data() {
        let data = json!({
            "emp_code": "000001",
            "first_name": "ignored",
            "raw_data": {
                "EMP_CODE": "653004",
                "PREFIX_NAME": "นางสาว",
                "FIRST_NAME": "สมหญิง",
                "LAST_NAME": "ดีใจ",
                "POSITION": "อาจารย์",
                "LEVEL_ID": 60,
                "USER_TYPE": " Staff ",
                "PHONE": "0812345678"
            }
        });

        let profile = EmployeeProfile::from_login_data(&data, &RoleMarkers::default()).unwrap();
        assert_eq!(profile.emp_code, "653004");
        assert_eq!(profile.first_name, "สมหญิง");
        assert_eq!(profile.full_name, "นางสาว สมหญิง ดีใจ");
        assert_eq!(profile.position_name, "อาจารย์");
        assert_eq!(profile.level_code, "60");
        assert_eq!(profile.user_type, "staff");
        assert_eq!(profile.user_role, UserRole::User);
        assert_eq!(profile.gender, "หญิง");
        assert_eq!(profile.phone, "0812345678");
    }

    #[test]
    fn test_from_login_data_flat_fallbacks() {
        let data = json!({
            "user_id": "42",
            "prefix_name": "Mr.",
            "full_name": "John Smith",
            "user_role": "Administrator"
        });

        let profile = EmployeeProfile::from_login_data(&data, &RoleMarkers::default()).unwrap();
        assert_eq!(profile.emp_code, "42");
        assert_eq!(profile.full_name, "Mr.");
        assert_eq!(profile.user_type, "employee");
        assert_eq!(profile.user_role, UserRole::Admin);
        assert_eq!(profile.gender, "ชาย");
    }

    #[test]
    fn test_from_login_data_admin_type() {
        let data = json!({"raw_data": {"USER_TYPE": "ADMIN"}});
        let profile = EmployeeProfile::from_login_data(&data, &RoleMarkers::default()).unwrap();
        assert_eq!(profile.user_role, UserRole::Admin);
        assert_eq!(profile.gender, "ไม่ระบุ");
    }

    #[test]
    fn test_from_login_data_rejects_non_object() {
        assert!(EmployeeProfile::from_login_data(&json!("x"), &RoleMarkers::default()).is_none());
    }

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            username: "653004".into(),
            password: "secret".into(),
        };
        assert!(ok.validate().is_ok());

        let missing = LoginRequest {
            username: String::new(),
            password: "secret".into(),
        };
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let profile = EmployeeProfile::from_login_data(&json!({}), &RoleMarkers::default()).unwrap();
        let session = LoginSession::start(profile, now, 600);
        assert_eq!(session.expires_at - session.login_at, Duration::seconds(600));
    }
}
