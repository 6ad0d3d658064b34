//! The `?action=` surface of the registration API.
//!
//! Every action shares one route; the `action` query parameter selects the
//! handler and defaults to `register`.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::Response,
};
use chrono::Utc;
use domain::models::{
    EmployeeProfile, GroupField, LoginRequest, LoginSession, RegistrationCandidate,
    RegistrationStats,
};
use domain::services::classification::{is_admin_caller, DEFAULT_USER_TYPE};
use domain::services::Payload;
use serde::Serialize;
use serde_json::Value;
use shared::pagination::parse_limit;
use validator::Validate;

use super::success;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::record_admission;
use crate::services::LoginError;

pub const DETAIL_NOT_FOUND_MESSAGE: &str = "ยังไม่มีข้อมูลการลงทะเบียนของผู้ใช้งานนี้";

/// Actions served by [`dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Register,
    Window,
    PublicTotal,
    List,
    Stats,
    Detail,
    Login,
}

impl Action {
    /// Resolves the `action` parameter. A missing parameter means `register`.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("register") => Some(Action::Register),
            Some("window") => Some(Action::Window),
            Some("public_total") => Some(Action::PublicTotal),
            Some("list") => Some(Action::List),
            Some("stats") => Some(Action::Stats),
            Some("detail") => Some(Action::Detail),
            Some("login") => Some(Action::Login),
            Some(_) => None,
        }
    }

    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Register => "register",
            Action::Window => "window",
            Action::PublicTotal => "public_total",
            Action::List => "list",
            Action::Stats => "stats",
            Action::Detail => "detail",
            Action::Login => "login",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PublicTotal {
    pub total: i64,
    pub primary_capacity: i64,
    pub reserve_capacity: i64,
    pub total_capacity: i64,
    pub remaining: Option<i64>,
    pub is_full: bool,
}

#[derive(Debug, Serialize)]
pub struct RegistrationList<T> {
    pub items: Vec<T>,
    pub total: usize,
}

/// Single entry point for every action.
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let action = Action::parse(query.get("action").map(String::as_str))
        .ok_or_else(|| ApiError::Validation("Unknown action".to_string()))?;

    let body: Option<Value> = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    let payload = Payload::new(body, query);

    match action {
        Action::Register => register(&state, &method, &payload).await,
        Action::Window => window(&state).await,
        Action::PublicTotal => public_total(&state).await,
        Action::List => list(&state, &payload).await,
        Action::Stats => stats(&state, &payload).await,
        Action::Detail => detail(&state, &payload).await,
        Action::Login => login(&state, &method, &payload).await,
    }
}

fn require_post(method: &Method) -> Result<(), ApiError> {
    if *method == Method::POST {
        Ok(())
    } else {
        Err(ApiError::MethodNotAllowed(
            "Method Not Allowed: use POST".to_string(),
        ))
    }
}

async fn register(state: &AppState, method: &Method, payload: &Payload) -> Result<Response, ApiError> {
    require_post(method)?;

    let now = Utc::now();
    let window = state.windows.current(now).await?;
    let candidate = RegistrationCandidate::from_payload(payload);

    let result = state.gate.submit(&window, now, candidate).await;
    record_admission(match &result {
        Ok(_) => "admitted",
        Err(err) => err.outcome(),
    });

    let receipt = result?;
    Ok(success(
        StatusCode::CREATED,
        "Registration successful",
        receipt,
    ))
}

async fn window(state: &AppState) -> Result<Response, ApiError> {
    let now = Utc::now();
    let snapshot = state.windows.current(now).await?.snapshot(now);
    Ok(success(StatusCode::OK, "Registration window", snapshot))
}

async fn public_total(state: &AppState) -> Result<Response, ApiError> {
    let total = state.ledger.count_non_admin().await?;
    let capacity = state.gate.policy().capacity;

    Ok(success(
        StatusCode::OK,
        "Registration total fetched",
        PublicTotal {
            total,
            primary_capacity: capacity.primary_capacity,
            reserve_capacity: capacity.reserve_capacity,
            total_capacity: capacity.total_capacity,
            remaining: capacity.remaining(total),
            is_full: capacity.is_full(total),
        },
    ))
}

/// Admin-only guard for `list` and `stats`.
fn require_admin(state: &AppState, payload: &Payload) -> Result<(), ApiError> {
    let role = payload.text_or_empty(&["user_role"]);
    let user_type = payload
        .text(&["user_type"])
        .unwrap_or_else(|| DEFAULT_USER_TYPE.to_string());
    let emp_code = payload.text_or_empty(&["emp_code"]);

    if is_admin_caller(
        &role,
        &user_type,
        &emp_code,
        &state.gate.policy().admin_markers,
        &state.config.security.admin_emp_codes,
    ) {
        Ok(())
    } else {
        tracing::info!(emp_code = %emp_code.trim(), "Admin action denied");
        Err(ApiError::Forbidden("Access denied: admin only".to_string()))
    }
}

async fn list(state: &AppState, payload: &Payload) -> Result<Response, ApiError> {
    require_admin(state, payload)?;

    let limit = parse_limit(payload.text(&["limit"]).as_deref());
    let items = state.ledger.list_all(limit).await?;

    Ok(success(
        StatusCode::OK,
        "Registration list fetched",
        RegistrationList {
            total: items.len(),
            items,
        },
    ))
}

async fn stats(state: &AppState, payload: &Payload) -> Result<Response, ApiError> {
    require_admin(state, payload)?;

    let mut stats = RegistrationStats {
        total: state.ledger.count_non_admin().await?,
        ..Default::default()
    };
    for field in GroupField::ALL {
        let counts = state.ledger.group_count(field).await?;
        stats.set_breakdown(field, counts);
    }

    Ok(success(StatusCode::OK, "Statistics fetched", stats))
}

async fn detail(state: &AppState, payload: &Payload) -> Result<Response, ApiError> {
    let emp_code = payload.text_or_empty(&["emp_code"]);
    let emp_code = emp_code.trim();
    if emp_code.is_empty() {
        return Err(ApiError::Validation("Missing emp_code".to_string()));
    }

    let detail = state
        .ranker
        .detail_for(emp_code)
        .await?
        .ok_or_else(|| ApiError::NotFound(DETAIL_NOT_FOUND_MESSAGE.to_string()))?;

    Ok(success(StatusCode::OK, "Registration detail", detail))
}

async fn login(state: &AppState, method: &Method, payload: &Payload) -> Result<Response, ApiError> {
    require_post(method)?;

    let request = LoginRequest {
        username: payload.text_or_empty(&["username"]).trim().to_string(),
        password: payload.text_or_empty(&["password"]),
    };
    request.validate()?;

    let data = state.hr_login.authenticate(&request).await?;
    let profile = EmployeeProfile::from_login_data(&data, &state.gate.policy().admin_markers)
        .ok_or_else(|| LoginError::InvalidResponse("user data is not an object".to_string()))?;

    tracing::info!(
        emp_code = %profile.emp_code,
        user_role = profile.user_role.as_str(),
        "Login successful"
    );

    let session = LoginSession::start(
        profile,
        Utc::now(),
        state.config.hr_login.session_timeout_secs,
    );
    Ok(success(StatusCode::OK, "Login successful", session))
}
