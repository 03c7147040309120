//! Core error types for cyclewake-core.
//!
//! The calculation itself is total over valid input; these errors only
//! surface at the boundaries (input validation and the config store).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cyclewake-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Input validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No bedtime was supplied
    #[error("A bedtime is required")]
    MissingBedtime,

    /// Cycle length must be positive and at most a day
    #[error("Invalid cycle length: {minutes} minutes (must be between 1 and 1440)")]
    InvalidCycleLength { minutes: i64 },

    /// At least one cycle, and no more than a night can hold
    #[error("Invalid cycle count: {count} (must be between 1 and 24)")]
    InvalidCycleCount { count: usize },

    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be after start ({start})")]
    InvalidTimeRange {
        start: chrono::NaiveDateTime,
        end: chrono::NaiveDateTime,
    },

    /// Wall-clock text could not be parsed
    #[error("Invalid time '{input}': expected HH:MM")]
    InvalidClock { input: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
