//! Prometheus metrics middleware and business counters.

use std::sync::OnceLock;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::trace_id::action_param;
use crate::routes::registrations::Action;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Label for requests whose `action` is not one the dispatcher serves.
pub const UNKNOWN_ACTION_LABEL: &str = "unknown";

const DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Records `http_requests_total` and `http_request_duration_seconds`,
/// labelled by method, route and action.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = method_to_str(req.method());
    let action = action_label(&req);
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!(
        "http_requests_total",
        "method" => method,
        "path" => path.clone(),
        "action" => action,
        "status" => status
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "action" => action
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Bounded `action` label. Unrecognised values collapse to
/// [`UNKNOWN_ACTION_LABEL`] so clients cannot mint new series.
fn action_label<B>(req: &Request<B>) -> &'static str {
    Action::parse(action_param(req).as_deref())
        .map(|action| action.as_str())
        .unwrap_or(UNKNOWN_ACTION_LABEL)
}

fn method_to_str(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::OPTIONS => "OPTIONS",
        Method::HEAD => "HEAD",
        _ => "OTHER",
    }
}

/// Counts a gate decision. `outcome` is `admitted` or a rejection reason.
pub fn record_admission(outcome: &'static str) {
    if outcome == "admitted" {
        counter!("registrations_admitted_total").increment(1);
    } else {
        counter!("registrations_rejected_total", "reason" => outcome).increment(1);
    }
}

/// Installs the global Prometheus recorder. Call once at startup.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .set_buckets(DURATION_BUCKETS)?
        .install_recorder()?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("Prometheus recorder already initialized"))
}

/// `GET /metrics` in Prometheus text format.
pub async fn metrics_handler() -> Response {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized",
        )
            .into_response(),
    }
}
