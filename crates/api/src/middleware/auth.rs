//! API key middleware for the action surface.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::extractors::api_key::ApiKeyAuth;

/// Rejects requests that do not present the configured API key.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    match ApiKeyAuth::from_request_parts(&mut parts, &state).await {
        Ok(ApiKeyAuth) => next.run(Request::from_parts(parts, body)).await,
        Err(err) => err.into_response(),
    }
}
