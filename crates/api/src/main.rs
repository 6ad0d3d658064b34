use anyhow::Result;
use tracing::info;

use proctor_registration_api::{app, config::Config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::init_logging(&config.logging)?;
    middleware::init_metrics()?;

    info!(
        "Starting proctor registration API v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db_config = persistence::db::DatabaseConfig::from(&config.database);
    let pool = persistence::db::create_pool(&db_config).await?;
    persistence::db::run_migrations(&pool).await?;

    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool)?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
