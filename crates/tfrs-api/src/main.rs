//! # tfrs-api — Binary Entry Point
//!
//! Reads configuration from the environment, loads the reference catalog
//! and serves the API on `0.0.0.0:$PORT`.

use tfrs_api::state::{AppConfig, AppState, LogFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let port = config.port;
    let state = AppState::from_config(config).map_err(|e| {
        tracing::error!("Reference data load failed: {e}");
        e
    })?;
    tracing::info!(
        fuels = state.reference.approved_fuels().len(),
        expected_uses = state.catalog.expected_uses.len(),
        "reference catalog ready"
    );

    let app = tfrs_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("TFRS API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
