//! Line logger writing to a file or the console

use chrono::Local;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use super::{LogDestination, LogLevel, LoggerConfig, LoggerLayer};
use crate::error::Result;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Writes `timestamp - LEVEL - message` lines at or above a configured level.
pub struct Logger {
    config: LoggerConfig,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    /// Open the configured destination.
    ///
    /// A log file is created if needed and either appended to or truncated
    /// depending on `config.append`.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        let sink: Box<dyn Write + Send> = match &config.destination {
            LogDestination::Console => Box::new(io::stderr()),
            LogDestination::File(path) => Box::new(
                OpenOptions::new()
                    .create(true)
                    .write(true)
                    .append(config.append)
                    .truncate(!config.append)
                    .open(path)?,
            ),
        };
        Ok(Self::from_sink(config, sink))
    }

    /// Build a logger over an arbitrary writer, ignoring `config.destination`.
    pub fn with_writer(config: LoggerConfig, writer: impl Write + Send + 'static) -> Self {
        Self::from_sink(config, Box::new(writer))
    }

    fn from_sink(config: LoggerConfig, sink: Box<dyn Write + Send>) -> Self {
        Self {
            config,
            sink: Mutex::new(sink),
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    pub fn destination(&self) -> &LogDestination {
        &self.config.destination
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.config.level
    }

    /// Write one record. Records below the configured level are dropped
    /// and write failures are ignored.
    pub fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let line = format_line(level, message);
        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "{}", line);
            let _ = sink.flush();
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn critical(&self, message: &str) {
        self.log(LogLevel::Critical, message);
    }

    /// A `tracing_subscriber` layer that forwards events to this logger
    pub fn layer(self: &Arc<Self>) -> LoggerLayer {
        LoggerLayer::new(Arc::clone(self))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("config", &self.config).finish()
    }
}

fn format_line(level: LogLevel, message: &str) -> String {
    format!(
        "{} - {} - {}",
        Local::now().format(TIMESTAMP_FORMAT),
        level,
        message
    )
}

/// Holds the one logger of a process.
///
/// The first [`LoggerCell::get_or_init`] builds the logger; every later call
/// returns that same handle and ignores its arguments. Owned by the startup
/// code and passed down explicitly.
#[derive(Debug, Default)]
pub struct LoggerCell {
    inner: OnceLock<Arc<Logger>>,
}

impl LoggerCell {
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    pub fn get_or_init(&self, config: LoggerConfig) -> Result<Arc<Logger>> {
        if let Some(logger) = self.inner.get() {
            return Ok(Arc::clone(logger));
        }
        let logger = Arc::new(Logger::new(config)?);
        Ok(Arc::clone(self.inner.get_or_init(|| logger)))
    }

    pub fn get(&self) -> Option<Arc<Logger>> {
        self.inner.get().cloned()
    }
}
