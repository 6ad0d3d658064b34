//! HTTP middleware components.

pub mod auth;
pub mod logging;
pub mod metrics;
pub mod preflight;
pub mod trace_id;

pub use auth::require_api_key;
pub use logging::init_logging;
pub use metrics::{init_metrics, metrics_handler, metrics_middleware, record_admission};
pub use preflight::preflight;
pub use trace_id::{trace_id, RequestId, REQUEST_ID_HEADER};
