//! HTTP route handlers.

pub mod health;
pub mod registrations;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success envelope: `{ "status": true, "message": ..., "data": ... }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub message: String,
    pub data: T,
}

pub fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    let body = Envelope {
        status: true,
        message: message.to_string(),
        data,
    };
    (status, Json(body)).into_response()
}
