//! CORS preflight short-circuit.
//!
//! `OPTIONS` requests are answered with `204 No Content` before the API key
//! check runs, so browsers can complete preflight without credentials.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, X-API-KEY, Authorization";

/// Origin to echo back: any origin when none are configured, otherwise only
/// a listed one.
fn allowed_origin(configured: &[String], origin: Option<&HeaderValue>) -> Option<HeaderValue> {
    if configured.is_empty() {
        return Some(HeaderValue::from_static("*"));
    }
    let origin = origin?;
    let text = origin.to_str().ok()?;
    configured
        .iter()
        .any(|allowed| allowed == text)
        .then(|| origin.clone())
}

pub async fn preflight(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    if req.method() != Method::OPTIONS {
        return next.run(req).await;
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    if let Some(origin) = allowed_origin(
        &state.config.security.cors_origins,
        req.headers().get(header::ORIGIN),
    ) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    response
}
