mod api;
mod config;
mod dimension;
mod error;
mod params;
mod query_analytics;
mod query_data;
mod sql;
mod state;
mod warehouse;

use config::{Config, DEFAULT_LISTEN};
use state::AppState;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("DORIS_ANALYTICS_CONFIG").unwrap_or_else(|_| "config.toml".into());
    let cfg = Config::load(&config_path)?;

    let state = Arc::new(AppState::from_config(&cfg)?);
    let app = api::router(state);

    let listen = cfg.listen.unwrap_or_else(|| DEFAULT_LISTEN.into());
    let addr: SocketAddr = listen.parse()?;
    info!(
        %addr,
        "Starting doris-analytics, warehouse at {}:{}",
        cfg.warehouse.host,
        cfg.warehouse.port
    );

    let server = axum::Server::bind(&addr).serve(app.into_make_service());

    let graceful = server.with_graceful_shutdown(shutdown_signal());
    graceful.await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
