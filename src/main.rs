//! ==============================================================================
//! main.rs - smart farming backend entry point
//! ==============================================================================
//!
//! purpose:
//!     receives sensor readings from field devices (or the simulator),
//!     appends them to db.json, and serves them to the polling dashboard.
//!
//! responsibilities:
//!     - load configuration (farm.toml + env overrides)
//!     - open and initialize the reading store once, before serving
//!     - serve the device api and dashboard with permissive cors
//!     - shut down cleanly on ctrl-c
//!
//! relationships:
//!     - uses: config.rs, logging.rs
//!     - uses: store (JsonFileStore / MemoryStore behind ReadingStore)
//!     - uses: api.rs (router + handlers), dashboard.rs (via api.rs)
//!
//! architecture:
//!
//!     ┌──────────────┐   POST /api/devices   ┌─────────────────────────┐
//!     │  simulator   │ ────────────────────▶ │  axum router (api.rs)   │
//!     └──────────────┘                       │                         │
//!     ┌──────────────┐   GET /api/devices    │   ┌─────────────────┐   │
//!     │  dashboard   │ ◀───────────────────▶ │   │  ReadingStore   │   │
//!     │  (browser)   │                       │   └────────┬────────┘   │
//!     └──────────────┘                       └────────────┼────────────┘
//!                                                         ▼
//!                                                      db.json
//!
//! ==============================================================================

use std::net::SocketAddr;

use anyhow::{Context, Result};
use farm_telemetry::{api, config, logging, store};

#[tokio::main]
async fn main() -> Result<()> {
    // startup banner
    println!("===========================================================");
    println!("  Smart Farming Backend");
    println!("===========================================================");

    // step 1: load configuration
    let config = config::FarmConfig::load_or_default();
    logging::init(&config.logging);
    config.print_summary();

    // step 2: open the store and make sure the document exists
    let store = store::open(&config.store);
    store
        .initialize()
        .await
        .context("failed to initialize reading store")?;
    tracing::info!("[STARTUP] ✓ Store ready ({} readings)", store.count().await?);

    // step 3: build the router
    let app = api::router(api::AppState::new(store, &config.dashboard));

    // step 4: serve until ctrl-c
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("[STARTUP] ✓ Backend listening on {}", config.server.port);
    tracing::info!("[STARTUP] ✓ Dashboard live at http://{}/dashboard", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("[SHUTDOWN] Backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[ERROR] Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
