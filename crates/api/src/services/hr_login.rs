//! Client for the external HR login service.
//!
//! The HR service owns credential validation and the employee directory. It is
//! called with `GET <url>?action=login&username=..&password=..` and answers
//! `{ "status" | "success": bool, "message": ..., "data": {...} }`.

use std::time::Duration;

use async_trait::async_trait;
use domain::models::LoginRequest;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::HrLoginConfig;
use crate::error::ApiError;

/// Message used when the HR service rejects the credentials.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "ชื่อผู้ใช้หรือรหัสผ่านไม่ถูกต้อง";

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Login request timed out after {0}ms")]
    Timeout(u64),

    #[error("Login service unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid response from login service: {0}")]
    InvalidResponse(String),
}

impl From<LoginError> for ApiError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials(message) => ApiError::Unauthorized(message),
            LoginError::Timeout(_) => ApiError::GatewayTimeout,
            LoginError::Unavailable(_) | LoginError::InvalidResponse(_) => {
                warn!(error = %err, "HR login failed");
                ApiError::BadGateway("Unable to reach the login service".to_string())
            }
        }
    }
}

/// Credential check against the HR directory. Returns the raw `data` object.
#[async_trait]
pub trait HrLoginService: Send + Sync {
    async fn authenticate(&self, request: &LoginRequest) -> Result<Value, LoginError>;
}

/// reqwest-backed HR login client with a bounded per-call timeout.
pub struct HttpHrLoginClient {
    client: Client,
    config: HrLoginConfig,
}

impl HttpHrLoginClient {
    pub fn new(config: HrLoginConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }
}

fn is_success(payload: &Value) -> bool {
    let flag = match payload.get("status") {
        Some(Value::Null) | None => payload.get("success"),
        other => other,
    };
    flag.map(domain::services::payload::is_truthy)
        .unwrap_or(false)
}

fn message_of(payload: &Value) -> Option<String> {
    payload
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

#[async_trait]
impl HrLoginService for HttpHrLoginClient {
    async fn authenticate(&self, request: &LoginRequest) -> Result<Value, LoginError> {
        debug!(username = %request.username.trim(), "Forwarding login to HR service");

        let mut call = self.client.get(&self.config.url).query(&[
            ("action", "login"),
            ("username", request.username.trim()),
            ("password", request.password.as_str()),
        ]);
        if !self.config.api_key.is_empty() {
            call = call.header("X-API-KEY", &self.config.api_key);
        }

        let response = call.send().await.map_err(|e| {
            if e.is_timeout() {
                LoginError::Timeout(self.config.timeout_ms)
            } else {
                LoginError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        let payload: Option<Value> = match response.json().await {
            Ok(value) => Some(value),
            Err(e) if e.is_timeout() => return Err(LoginError::Timeout(self.config.timeout_ms)),
            Err(_) => None,
        };

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(LoginError::InvalidCredentials(
                INVALID_CREDENTIALS_MESSAGE.to_string(),
            ));
        }
        if !status.is_success() {
            let message = payload.as_ref().and_then(message_of);
            return Err(LoginError::Unavailable(
                message.unwrap_or_else(|| format!("HTTP {status}")),
            ));
        }

        let payload =
            payload.ok_or_else(|| LoginError::InvalidResponse("body is not JSON".to_string()))?;

        if !is_success(&payload) {
            return Err(LoginError::InvalidCredentials(
                message_of(&payload).unwrap_or_else(|| INVALID_CREDENTIALS_MESSAGE.to_string()),
            ));
        }

        match payload.get("data") {
            Some(data) if data.is_object() => Ok(data.clone()),
            _ => Err(LoginError::InvalidResponse(
                "missing user data".to_string(),
            )),
        }
    }
}
