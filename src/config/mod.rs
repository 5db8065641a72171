//! Builds an `AppConfig` from the files in `./config` and the process environment.
//! The result is handed to the app explicitly at startup, nothing reads it globally.

mod error;
mod types;

use tracing::info;

// Re-export config structs
pub use error::{ConfigError, ConfigResult};
pub use types::{AppConfig, Environment, NetConfig, StoreConfig, StoreKind, STORE_KEY_ENV};

/// Loads the configuration for the environment named by `APP_ENVIRONMENT` (defaults to `local`).
pub fn load() -> ConfigResult<AppConfig> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()?;
    info!(
        "{:<20} - {}",
        "Loading configuration",
        environment.as_ref()
    );

    let config_dir = std::env::current_dir()?.join("config");

    AppConfig::from_dir(&config_dir, environment)
}
