//! Error types for AI document operations

use crate::{EnumParseError, ValidationReport};
use thiserror::Error;

/// Field schema lookup errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    #[error("Unknown column: {column}")]
    UnknownColumn { column: String },
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Record not found: {key}")]
    NotFound { key: String },

    #[error("Duplicate uuid: {uuid}")]
    DuplicateUuid { uuid: String },

    #[error("Duplicate row id: {id}")]
    DuplicateId { id: i64 },

    #[error("Stale snapshot for {uuid}: expected updatedAt {expected}, found {found}")]
    StaleSnapshot {
        uuid: String,
        expected: String,
        found: String,
    },

    #[error("Row id of {uuid} cannot change")]
    IdChanged { uuid: String },

    #[error("Row id space exhausted")]
    IdSpaceExhausted,

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Master error type for all AI document operations.
#[derive(Debug, Error)]
pub enum AidocError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Enum error: {0}")]
    Enum(#[from] EnumParseError),

    #[error("Record rejected: {0}")]
    Rejected(ValidationReport),

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

/// Result type alias for AI document operations.
pub type AidocResult<T> = Result<T, AidocError>;

// =============================================================================
// TESTS
// =============================================================================
