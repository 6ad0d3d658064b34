use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{AdmissionError, StoreError};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Message for a timed-out call to the HR login service.
pub const TIMEOUT_MESSAGE: &str = "connection timed out";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Carries the conflicting resource so clients can show it.
    #[error("Conflict: {0}")]
    Conflict(String, Value),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Locked: {0}")]
    Locked(String, Option<Value>),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Gateway timeout")]
    GatewayTimeout,
}

/// Failure envelope: `{ "status": false, "message": ..., "data"?: ... }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(..) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Locked(..) => StatusCode::LOCKED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::GatewayTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, data) = match self {
            ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::MethodNotAllowed(msg)
            | ApiError::Validation(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::BadGateway(msg) => (msg, None),
            ApiError::Conflict(msg, data) => (msg, Some(data)),
            ApiError::Locked(msg, data) => (msg, data),
            ApiError::GatewayTimeout => (TIMEOUT_MESSAGE.to_string(), None),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("An internal error occurred".to_string(), None)
            }
        };

        let body = ErrorBody {
            status: false,
            message,
            data,
        };

        (status, Json(body)).into_response()
    }
}

impl From<AdmissionError> for ApiError {
    fn from(err: AdmissionError) -> Self {
        let message = err.to_string();
        match err {
            AdmissionError::WindowNotYetOpen { opens_at } => {
                ApiError::Locked(message, Some(json!({ "opens_at": opens_at })))
            }
            AdmissionError::WindowClosed { closes_at } => {
                ApiError::Locked(message, Some(json!({ "closes_at": closes_at })))
            }
            AdmissionError::CapacityExceeded {
                registered,
                capacity,
            } => ApiError::Locked(
                message,
                Some(json!({ "registered": registered, "total_capacity": capacity })),
            ),
            AdmissionError::MissingFields(_) => ApiError::Validation(message),
            AdmissionError::InvalidField(field) => {
                ApiError::Validation(format!("Invalid value for {field}"))
            }
            AdmissionError::ConfirmationRequired => ApiError::Unprocessable(message),
            AdmissionError::IneligibleLevel(_) => ApiError::Forbidden(message),
            AdmissionError::AlreadyRegistered(detail) => {
                ApiError::Conflict(message, json!(detail))
            }
            AdmissionError::Storage(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .values()
            .flat_map(|errors| {
                errors
                    .iter()
                    .map(|e| e.message.clone().map(|m| m.to_string()).unwrap_or_default())
            })
            .collect();

        let message = match messages.as_slice() {
            [single] => single.clone(),
            _ => format!("{} validation errors", messages.len()),
        };

        ApiError::Validation(message)
    }
}
