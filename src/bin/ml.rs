//! farm-ml: irrigation prediction service (GET /, POST /predict).
//!
//! env: ML_PORT (default 5000)

use std::net::SocketAddr;

use anyhow::{Context, Result};
use farm_telemetry::{config, logging, predict};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::FarmConfig::load_or_default();
    logging::init(&config.logging);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.ml.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("[ML] ✓ Prediction service listening on {}", config.ml.port);

    axum::serve(listener, predict::router())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    tracing::info!("[ML] Stopped");
    Ok(())
}
