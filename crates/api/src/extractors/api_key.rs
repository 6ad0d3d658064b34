//! API key authentication extractor.
//!
//! The key is read from the `X-API-Key` header, falling back to the `api_key`
//! query parameter, and compared against the single configured secret.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use shared::crypto::{api_key_matches, key_fingerprint};

use crate::app::AppState;
use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "X-API-Key";
pub const API_KEY_QUERY_PARAM: &str = "api_key";
pub const INVALID_API_KEY_MESSAGE: &str = "Invalid API Key";

/// Proof that the request presented the configured API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiKeyAuth;

impl ApiKeyAuth {
    /// Checks a presented key against the configured one.
    ///
    /// An empty configured key disables the check.
    pub fn validate(expected: &str, presented: Option<&str>) -> Result<Self, ApiError> {
        if expected.is_empty() {
            return Ok(ApiKeyAuth);
        }

        match presented {
            Some(key) if api_key_matches(expected, key) => Ok(ApiKeyAuth),
            Some(key) => {
                tracing::debug!(key = %key_fingerprint(key), "Rejected API key");
                Err(ApiError::Unauthorized(INVALID_API_KEY_MESSAGE.to_string()))
            }
            None => Err(ApiError::Unauthorized(INVALID_API_KEY_MESSAGE.to_string())),
        }
    }
}

/// Key presented by the request, header first.
pub fn presented_key(parts: &Parts) -> Option<String> {
    let header = parts
        .headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    header.or_else(|| {
        Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(mut params)| params.remove(API_KEY_QUERY_PARAM))
            .filter(|v| !v.is_empty())
    })
}

#[async_trait]
impl FromRequestParts<AppState> for ApiKeyAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = presented_key(parts);
        Self::validate(&state.config.security.api_key, presented.as_deref())
    }
}
