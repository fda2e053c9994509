//! Backend entry-point: loads settings, migrates the database and serves the
//! REST API, WebSocket gateway and OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context as _, Result};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pizzeria::inbound::http::health::HealthState;
use pizzeria::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pizzeria::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("loading settings")?;
    let bind_addr = settings.bind_addr()?;
    let database_url = settings.database_url()?.to_owned();

    run_pending_migrations(&database_url)
        .await
        .wrap_err("applying database migrations")?;
    info!("database migrations applied");

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("building connection pool")?;

    let config = ServerConfig::new(settings, bind_addr, pool);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::prometheus_metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await.wrap_err("server terminated")
}
