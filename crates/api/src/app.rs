use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::{any, get},
    Router,
};
use domain::services::{AdmissionGate, QueueRanker, RegistrationLedger, WindowService, WindowStore};
use persistence::{RegistrationRepository, WindowRepository};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, preflight, require_api_key, trace_id};
use crate::routes::{health, registrations};
use crate::services::{HrLoginService, HttpHrLoginClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ledger: Arc<dyn RegistrationLedger>,
    pub gate: AdmissionGate,
    pub ranker: QueueRanker,
    pub windows: WindowService,
    pub hr_login: Arc<dyn HrLoginService>,
}

/// Storage and collaborator implementations the router is wired to.
pub struct Stores {
    pub ledger: Arc<dyn RegistrationLedger>,
    pub windows: Arc<dyn WindowStore>,
    pub hr_login: Arc<dyn HrLoginService>,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Self {
        let gate = AdmissionGate::new(stores.ledger.clone(), config.admission_policy());
        let windows = WindowService::new(stores.windows, config.window_defaults());

        Self {
            ranker: QueueRanker::new(stores.ledger.clone()),
            ledger: stores.ledger,
            gate,
            windows,
            hr_login: stores.hr_login,
            config: Arc::new(config),
        }
    }
}

/// Builds the application backed by PostgreSQL and the HTTP login client.
pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let hr_login = HttpHrLoginClient::new(config.hr_login.clone())?;
    let stores = Stores {
        ledger: Arc::new(RegistrationRepository::new(pool.clone())),
        windows: Arc::new(WindowRepository::new(pool)),
        hr_login: Arc::new(hr_login),
    };
    Ok(create_app_with_stores(config, stores))
}

pub fn create_app_with_stores(config: Config, stores: Stores) -> Router {
    let state = AppState::new(config, stores);
    let config = state.config.clone();

    let allowed_headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        HeaderName::from_static("x-api-key"),
    ];
    let origins = if config.security.cors_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(allowed_headers);

    // Every action shares one route, guarded by the API key.
    let action_routes = Router::new()
        .route("/", any(registrations::dispatch))
        .route("/api", any(registrations::dispatch))
        .route("/api/", any(registrations::dispatch))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Layers added later wrap earlier ones, so preflight runs first.
    Router::new()
        .merge(public_routes)
        .merge(action_routes)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .layer(middleware::from_fn_with_state(state.clone(), preflight))
        .with_state(state)
}
