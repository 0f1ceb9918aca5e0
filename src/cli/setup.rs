//! Startup sequence: settings first, then the logger built from them

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ConfigStore;
use crate::logging::{LogLevel, Logger, LoggerCell, LoggerConfig};

/// Open the store holding the `[logging]` section
pub fn open_settings(config_path: &Path) -> Result<ConfigStore> {
    Ok(ConfigStore::open(config_path, [LoggerConfig::record_type()])?)
}

/// Load the `[logging]` section from `config_path`
pub fn load_logger_config(config_path: &Path) -> Result<LoggerConfig> {
    Ok(LoggerConfig::from_store(&open_settings(config_path)?)?)
}

/// `EnvFilter` directive matching the configured logger level
pub fn default_directive(level: LogLevel) -> String {
    let level = match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warning => "warn",
        LogLevel::Error | LogLevel::Critical => "error",
    };
    format!("inistore={level}")
}

/// Subscriber that forwards `tracing` events to `logger`.
///
/// `RUST_LOG` narrows what reaches the logger; without it, events from this
/// crate at or above the logger's own level pass.
pub fn subscriber(logger: &Arc<Logger>) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(logger.level())));
    tracing_subscriber::registry()
        .with(filter)
        .with(logger.layer())
}

/// Log what startup could not report before the logger existed
pub fn report_startup(store: &ConfigStore) {
    if let Some(reason) = store.fallback_reason() {
        tracing::warn!(path = %store.path().display(), "{}, using default settings", reason);
    }
}

/// Build the process logger and install it as the global `tracing` subscriber.
pub fn init_logging(config_path: &Path, cell: &LoggerCell) -> Result<Arc<Logger>> {
    let store = open_settings(config_path)?;
    let logger = cell.get_or_init(LoggerConfig::from_store(&store)?)?;

    subscriber(&logger).try_init()?;
    report_startup(&store);

    Ok(logger)
}
