//! Error types for inistore

use thiserror::Error;

use crate::config::FieldKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Cannot convert '{value}' to {kind} for field '{field}' in [{record}]")]
    TypeConversion {
        record: String,
        field: String,
        kind: FieldKind,
        value: String,
    },

    #[error("Record '{0}' not found")]
    RecordNotFound(String),

    #[error("Field '{field}' not found in [{record}]")]
    FieldNotFound { record: String, field: String },

    #[error("Field '{field}' in [{record}] is {expected}, got {found}")]
    TypeMismatch {
        record: String,
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },

    #[error("Invalid name: {0}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
