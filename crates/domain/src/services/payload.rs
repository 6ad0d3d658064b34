//! Request payload access with ordered alias resolution.
//!
//! Each field is looked up through a list of candidate keys. For every key the
//! JSON body is consulted first, then the query string. The first present,
//! non-null value wins; an empty string counts as present.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::models::RegistrationCandidate;

/// Merged view of a request's JSON body and query string.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    body: Map<String, Value>,
    query: HashMap<String, String>,
}

impl Payload {
    /// Builds a payload. Non-object bodies are ignored.
    pub fn new(body: Option<Value>, query: HashMap<String, String>) -> Self {
        let body = match body {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self { body, query }
    }

    /// Raw value for the first resolvable alias.
    fn lookup(&self, keys: &[&str]) -> Option<Value> {
        keys.iter().find_map(|key| {
            match self.body.get(*key) {
                Some(Value::Null) | None => None,
                Some(value) => Some(value.clone()),
            }
            .or_else(|| self.query.get(*key).map(|v| Value::String(v.clone())))
        })
    }

    /// Text value for the first resolvable alias, or `None`.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        self.lookup(keys).and_then(|value| value_to_text(&value))
    }

    /// Text value or an empty string.
    pub fn text_or_empty(&self, keys: &[&str]) -> String {
        self.text(keys).unwrap_or_default()
    }

    /// Loose truthiness of the first resolvable alias. Absent is false.
    pub fn flag(&self, keys: &[&str]) -> bool {
        self.lookup(keys).map(|value| is_truthy(&value)).unwrap_or(false)
    }
}

pub(crate) fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `true`, non-zero numbers, and non-empty strings other than `"0"` or
/// `"false"` are truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false")
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl RegistrationCandidate {
    /// Resolves a registration submission from the request payload.
    pub fn from_payload(payload: &Payload) -> Self {
        Self {
            emp_code: payload.text_or_empty(&["emp_code"]).trim().to_string(),
            registration_timestamp: payload
                .text_or_empty(&["registration_timestamp"])
                .trim()
                .to_string(),
            registration_datetime: payload.text_or_empty(&["registration_datetime"]),
            confirmed_data: payload.flag(&["confirmed_data"]),
            confirmed_exam: payload.flag(&["confirmed_exam"]),
            prefix_name: payload.text_or_empty(&["prefix_name"]),
            first_name: payload.text_or_empty(&["first_name"]),
            last_name: payload.text_or_empty(&["last_name"]),
            full_name: payload.text_or_empty(&["full_name"]),
            full_name_eng: payload.text_or_empty(&["full_name_eng"]),
            position_name: payload.text_or_empty(&["position_name"]),
            level_name: payload.text_or_empty(&["level_name"]),
            level_code: payload
                .text_or_empty(&["level_code", "LEVEL_CODE"])
                .trim()
                .to_string(),
            section_name: payload.text_or_empty(&["section_name"]),
            department_name: payload.text_or_empty(&["department_name"]),
            phone_number: payload
                .text_or_empty(&["phone_number", "phone"])
                .trim()
                .to_string(),
            user_type: payload.text_or_empty(&["user_type", "USER_TYPE"]),
            exam_date: payload.text(&["exam_date"]),
            sequence_number: payload.text(&["sequence_number"]),
            user_role: payload.text(&["user_role", "USER_ROLE"]),
            gender: payload.text(&["gender"]),
            status: payload.text(&["status"]),
        }
    }
}
