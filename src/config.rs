//! ==============================================================================
//! config.rs - Runtime Configuration Loader
//! ==============================================================================
//!
//! purpose:
//!     defines the schema for `farm.toml`.
//!     loads configuration from file or falls back to defaults, then applies
//!     environment overrides (PORT, DATA_FILE, API_URL, BACKEND_URL, DEVICE_ID,
//!     ML_PORT).
//!
//! structure:
//!     - ServerConfig: Listen port of the backend.
//!     - StoreConfig: Which store backend, where db.json lives, retention bound.
//!     - SimulatorConfig: Where the simulator posts and how often.
//!     - DashboardConfig: Backend url baked into the dashboard page.
//!     - MlConfig: Listen port of the irrigation prediction service.
//!     - LoggingConfig: Default log filter.
//!
//! ==============================================================================

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct FarmConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub ml: MlConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// whole-document json file (db.json)
    #[default]
    File,
    /// process memory, lost on exit
    Memory,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_file: PathBuf,
    /// drop the oldest readings beyond this many; unbounded when unset.
    /// must be at least 1
    pub max_readings: Option<usize>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    pub backend_url: String,
    pub device_id: String,
    pub interval_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_url: String,
    pub refresh_seconds: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MlConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub show_sensor_data: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3001 }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            data_file: PathBuf::from("db.json"),
            max_readings: None,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3001/api/devices".to_string(),
            device_id: "sim-01".to_string(),
            interval_seconds: 5,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3001".to_string(),
            refresh_seconds: 5,
        }
    }
}

impl Default for MlConfig {
    fn default() -> Self {
        Self { port: 5000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_sensor_data: true,
        }
    }
}

impl FarmConfig {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        Self::parse(&content)
    }

    /// Parse a toml document; missing sections take their defaults
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.store.max_readings == Some(0) {
            anyhow::bail!("store.max_readings must be at least 1 (omit it for no limit)");
        }
        Ok(())
    }

    /// Load with default fallback, then apply environment overrides
    pub fn load_or_default() -> Self {
        let paths = [
            PathBuf::from("config").join("farm.toml"),
            PathBuf::from("..").join("config").join("farm.toml"),
        ];

        let mut config = None;
        for path in &paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(loaded) => {
                        println!("[CONFIG] Loaded from {}", path.display());
                        config = Some(loaded);
                        break;
                    }
                    Err(e) => {
                        println!("[CONFIG] Warning: Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        let mut config = config.unwrap_or_else(|| {
            println!("[CONFIG] No config file found - using defaults");
            Self::default()
        });
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply environment-style overrides from `lookup`.
    ///
    /// `API_URL` wins over `REACT_APP_API_URL`; an unparseable `PORT` is
    /// ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = parse_port(&lookup, "PORT") {
            self.server.port = port;
        }
        if let Some(port) = parse_port(&lookup, "ML_PORT") {
            self.ml.port = port;
        }
        if let Some(file) = lookup("DATA_FILE") {
            self.store.data_file = PathBuf::from(file);
        }
        if let Some(url) = lookup("API_URL").or_else(|| lookup("REACT_APP_API_URL")) {
            self.dashboard.api_url = url;
        }
        if let Some(url) = lookup("BACKEND_URL") {
            self.simulator.backend_url = url;
        }
        if let Some(id) = lookup("DEVICE_ID") {
            self.simulator.device_id = id;
        }
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let backend = match self.store.backend {
            StoreBackend::File => format!("file ({})", self.store.data_file.display()),
            StoreBackend::Memory => "memory".to_string(),
        };
        let retention = self
            .store
            .max_readings
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unbounded".to_string());

        println!("┌─────────────────────────────────────────┐");
        println!("│           FARM CONFIGURATION            │");
        println!("├─────────────────────────────────────────┤");
        println!("│ Port: {}", self.server.port);
        println!("│ Store: {}", backend);
        println!("│ Retention: {}", retention);
        println!("│ Dashboard API: {}", self.dashboard.api_url);
        println!("│ Log Level: {}", self.logging.level);
        println!("└─────────────────────────────────────────┘");
    }
}

fn parse_port<F>(lookup: &F, key: &str) -> Option<u16>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(port) => Some(port),
        Err(_) => {
            println!("[CONFIG] Warning: ignoring invalid {} {:?}", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = FarmConfig::default();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.data_file, PathBuf::from("db.json"));
        assert_eq!(config.store.max_readings, None);
        assert_eq!(config.simulator.backend_url, "http://localhost:3001/api/devices");
        assert_eq!(config.simulator.device_id, "sim-01");
        assert_eq!(config.simulator.interval_seconds, 5);
        assert_eq!(config.dashboard.api_url, "http://localhost:3001");
        assert_eq!(config.ml.port, 5000);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = FarmConfig::parse(
            r#"
            [store]
            backend = "memory"
            max_readings = 500

            [simulator]
            device_id = "greenhouse-2"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.max_readings, Some(500));
        assert_eq!(config.store.data_file, PathBuf::from("db.json"));
        assert_eq!(config.simulator.device_id, "greenhouse-2");
        assert_eq!(config.simulator.interval_seconds, 5);
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        assert!(FarmConfig::parse("[store]\nbackend = \"redis\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("DATA_FILE", "/var/lib/farm/db.json"),
            ("REACT_APP_API_URL", "http://farm.local:8080"),
            ("BACKEND_URL", "http://farm.local:8080/api/devices"),
            ("DEVICE_ID", "field-7"),
            ("ML_PORT", "5050"),
        ]
        .into_iter()
        .collect();

        let mut config = FarmConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.data_file, PathBuf::from("/var/lib/farm/db.json"));
        assert_eq!(config.dashboard.api_url, "http://farm.local:8080");
        assert_eq!(config.simulator.backend_url, "http://farm.local:8080/api/devices");
        assert_eq!(config.simulator.device_id, "field-7");
        assert_eq!(config.ml.port, 5050);
    }

    #[test]
    fn test_api_url_beats_react_app_api_url() {
        let mut config = FarmConfig::default();
        config.apply_overrides(|key| match key {
            "API_URL" => Some("http://a".to_string()),
            "REACT_APP_API_URL" => Some("http://b".to_string()),
            _ => None,
        });
        assert_eq!(config.dashboard.api_url, "http://a");
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = FarmConfig::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 3001);
    }

    #[test]
    fn test_zero_retention_is_rejected() {
        let err = FarmConfig::parse("[store]\nmax_readings = 0").unwrap_err();
        assert!(err.to_string().contains("max_readings"));

        let config = FarmConfig::parse("[store]\nmax_readings = 1").unwrap();
        assert_eq!(config.store.max_readings, Some(1));
    }
}
