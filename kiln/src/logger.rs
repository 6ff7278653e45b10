//! Log output setup.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Installs the global subscriber. `log` records from the library crates are
/// forwarded into it.
///
/// Returns false if a subscriber was already installed.
pub fn init(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.module_path)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(level = %config.level, "Logger initialized");
    }
    installed
}
