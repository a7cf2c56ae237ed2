//! ==============================================================================
//! store - durable collection of sensor readings
//! ==============================================================================
//!
//! backends:
//!     - JsonFileStore: db.json on disk, re-read on every call, rewritten whole
//!       on every mutation (temp file + rename)
//!     - MemoryStore: in-process vec, used by tests and `backend = "memory"`
//!
//! both stamp readings the same way (uuid v4 id, rfc 3339 utc timestamp) and
//! share the tail / retention helpers below.
//!
//! ==============================================================================

mod json_file;
mod memory;
mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::ReadingStore;

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use crate::config::{StoreBackend, StoreConfig};
use crate::domain::{NewReading, Reading};
use crate::error::{StoreError, StoreResult};

/// build the configured backend; call `initialize` before serving
pub fn open(config: &StoreConfig) -> Arc<dyn ReadingStore> {
    match config.backend {
        StoreBackend::File => Arc::new(
            JsonFileStore::new(&config.data_file).with_retention(config.max_readings),
        ),
        StoreBackend::Memory => Arc::new(MemoryStore::new().with_retention(config.max_readings)),
    }
}

/// assign id + timestamp to an incoming payload
pub(crate) fn stamp(payload: NewReading) -> StoreResult<Reading> {
    let id = uuid::Uuid::new_v4().to_string();
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    payload
        .into_reading(id, timestamp)
        .ok_or(StoreError::MissingDeviceId)
}

/// the last `limit` readings, in insertion order
pub(crate) fn tail(readings: &[Reading], limit: usize) -> Vec<Reading> {
    let start = readings.len().saturating_sub(limit);
    readings[start..].to_vec()
}

/// drop the oldest readings so at most `max` remain. `Some(0)` is treated
/// as unbounded, never as "keep nothing"
pub(crate) fn apply_retention(readings: &mut Vec<Reading>, max: Option<usize>) {
    if let Some(max) = max.filter(|&max| max > 0) {
        if readings.len() > max {
            let excess = readings.len() - max;
            readings.drain(..excess);
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{NewReading, HUMIDITY, SOIL_MOISTURE, TEMPERATURE};
    use crate::domain::{Reading, SensorFields};

    /// the reading the simulator would send for `device`
    pub fn sample(device: &str) -> NewReading {
        NewReading::new(device)
            .with(SOIL_MOISTURE, 42.3)
            .with(HUMIDITY, 55.1)
            .with(TEMPERATURE, 21.0)
    }

    /// device names of `readings`, in order
    pub fn devices(readings: &[Reading]) -> Vec<String> {
        readings.iter().map(|r| r.device_name()).collect()
    }
}
