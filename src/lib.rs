//! inistore - typed INI settings persistence
//!
//! Record types declare typed fields with defaults; a [`ConfigStore`] loads
//! them from an INI file (falling back to defaults) and saves them back.
//! The [`Logger`] is configured once from the `[logging]` section.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use config::{ConfigStore, FieldKind, FieldValue, RecordInstance, RecordType};
pub use error::{Error, Result};
pub use logging::{LogDestination, LogLevel, Logger, LoggerCell, LoggerConfig};
