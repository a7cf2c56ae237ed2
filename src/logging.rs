//! tracing subscriber setup shared by both binaries.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// install the global fmt subscriber.
///
/// `RUST_LOG` wins over `logging.level`. calling this twice is harmless;
/// the second call keeps the first subscriber.
pub fn init(config: &LoggingConfig) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().parse_lossy(filter))
        .with_target(false)
        .try_init();
}
