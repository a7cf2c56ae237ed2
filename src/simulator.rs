//! ==============================================================================
//! simulator.rs - synthetic sensor node
//! ==============================================================================
//!
//! purpose:
//!     stands in for real soil/climate hardware. on startup and then every
//!     `interval_seconds` it generates one random reading and POSTs it to
//!     the backend.
//!
//! ranges (uniform, one decimal place):
//!     soil moisture  10 - 80 %
//!     humidity       30 - 90 %
//!     temperature    15 - 35 °C
//!
//! failures (transport errors, non-2xx) are logged and the loop moves on.
//! no retry, no backoff, no queue.
//!
//! ==============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use tokio::time::MissedTickBehavior;

use crate::config::SimulatorConfig;
use crate::domain::{NewReading, SensorFields, HUMIDITY, SOIL_MOISTURE, TEMPERATURE};

/// generate one reading for `device_id`
pub fn generate_reading<R: Rng>(rng: &mut R, device_id: &str) -> NewReading {
    NewReading::new(device_id)
        .with(SOIL_MOISTURE, round_tenth(rng.random_range(10.0..80.0)))
        .with(HUMIDITY, round_tenth(rng.random_range(30.0..90.0)))
        .with(TEMPERATURE, round_tenth(rng.random_range(15.0..35.0)))
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub struct Simulator {
    client: reqwest::Client,
    backend_url: String,
    device_id: String,
    interval: Duration,
    show_data: bool,
}

impl Simulator {
    pub fn new(config: &SimulatorConfig, show_data: bool) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            backend_url: config.backend_url.clone(),
            device_id: config.device_id.clone(),
            interval: Duration::from_secs(config.interval_seconds.max(1)),
            show_data,
        })
    }

    /// generate and submit a single reading
    pub async fn send_once(&self) -> Result<NewReading> {
        let reading = generate_reading(&mut rand::rng(), &self.device_id);

        self.client
            .post(&self.backend_url)
            .json(&reading)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.backend_url))?
            .error_for_status()
            .context("backend rejected reading")?;

        Ok(reading)
    }

    /// send immediately, then once per interval, forever
    pub async fn run(&self) {
        tracing::info!(
            "[SIM] Device {} -> {} every {}s",
            self.device_id,
            self.backend_url,
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.send_once().await {
                Ok(reading) => {
                    if self.show_data {
                        tracing::info!(
                            "[SIM] Sent soil: {:.1}% | humidity: {:.1}% | temp: {:.1}°C",
                            reading.soil_moisture().unwrap_or_default(),
                            reading.humidity().unwrap_or_default(),
                            reading.temperature().unwrap_or_default()
                        );
                    }
                }
                Err(e) => tracing::warn!("[SIM] ⚠ Send failed: {:#}", e),
            }
        }
    }
}
