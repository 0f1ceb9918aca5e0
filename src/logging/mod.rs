//! Process logger configured once from the `[logging]` config section

mod layer;
mod logger;

pub use layer::LoggerLayer;
pub use logger::{Logger, LoggerCell};

use std::fmt;
use std::path::PathBuf;

use crate::config::{ConfigStore, RecordInstance, RecordType};
use crate::error::Result;

/// Severity of a log record, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Match a level name case-insensitively. Unknown names fall back to INFO.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "DEBUG" => LogLevel::Debug,
            "INFO" => LogLevel::Info,
            "WARNING" => LogLevel::Warning,
            "ERROR" => LogLevel::Error,
            "CRITICAL" => LogLevel::Critical,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        if level == tracing::Level::ERROR {
            LogLevel::Error
        } else if level == tracing::Level::WARN {
            LogLevel::Warning
        } else if level == tracing::Level::INFO {
            LogLevel::Info
        } else {
            LogLevel::Debug
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// Standard error
    #[default]
    Console,
    File(PathBuf),
}

/// Logger settings, read once at startup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub destination: LogDestination,
    /// Append to an existing log file instead of truncating it
    pub append: bool,
}

impl LoggerConfig {
    /// Section holding the logger settings
    pub const SECTION: &'static str = "logging";

    /// Build from raw values. An empty or absent file means the console.
    pub fn new(level: &str, file: Option<PathBuf>, append: bool) -> Self {
        let destination = match file {
            Some(path) if !path.as_os_str().is_empty() => LogDestination::File(path),
            _ => LogDestination::Console,
        };
        Self {
            level: LogLevel::parse(level),
            destination,
            append,
        }
    }

    pub fn console(level: LogLevel) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    pub fn file(level: LogLevel, path: impl Into<PathBuf>, append: bool) -> Self {
        Self {
            level,
            destination: LogDestination::File(path.into()),
            append,
        }
    }

    /// Schema of the `[logging]` section
    pub fn record_type() -> RecordType {
        RecordType::new(Self::SECTION)
            .string("level", "INFO")
            .string("file", "")
            .boolean("append", false)
    }

    pub fn from_instance(instance: &RecordInstance) -> Result<Self> {
        let file = instance.get_str("file")?;
        Ok(Self::new(
            instance.get_str("level")?,
            Some(PathBuf::from(file)),
            instance.get_bool("append")?,
        ))
    }

    /// Read the settings from a store that registered [`LoggerConfig::record_type`]
    pub fn from_store(store: &ConfigStore) -> Result<Self> {
        Self::from_instance(store.get(Self::SECTION)?)
    }
}
