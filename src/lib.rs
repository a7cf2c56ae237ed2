//! smart farming telemetry: sensor ingest api, json file store, polling
//! dashboard and a device simulator.
//!
//! binaries:
//!     - farm-telemetry (src/main.rs): the backend
//!     - farm-simulator (src/bin/simulator.rs): synthetic sensor node
//!     - farm-ml (src/bin/ml.rs): irrigation prediction service

pub mod api;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod logging;
pub mod predict;
pub mod simulator;
pub mod store;
