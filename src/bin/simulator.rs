//! farm-simulator: posts a random reading to the backend every few seconds.
//!
//! env: BACKEND_URL (default http://localhost:3001/api/devices),
//!      DEVICE_ID (default sim-01)

use anyhow::Result;
use farm_telemetry::{config, logging, simulator::Simulator};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::FarmConfig::load_or_default();
    logging::init(&config.logging);

    let simulator = Simulator::new(&config.simulator, config.logging.show_sensor_data)?;

    tokio::select! {
        _ = simulator.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("[SIM] Stopped");
        }
    }
    Ok(())
}
