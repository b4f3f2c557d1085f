//! Core error types for sukoon-core.
//!
//! Each subsystem has its own error enum; [`CoreError`] wraps them so
//! callers that do not care about the distinction can use `?` throughout.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for sukoon-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Breathing timer errors
    #[error("Breathing error: {0}")]
    Breathing(#[from] BreathingError),

    /// Key-value store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Support chat errors
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Breathing timer errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BreathingError {
    /// Every phase of the pattern has a zero duration.
    #[error("Invalid breathing pattern '{name}': at least one phase must be longer than zero seconds")]
    InvalidPattern { name: String },

    /// No preset matches the requested name.
    #[error("Unknown breathing pattern: {0}")]
    UnknownPattern(String),
}

/// Key-value store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The stored blob could not be read or parsed.
    #[error("Failed to read '{key}': {message}")]
    Read { key: String, message: String },

    /// The blob could not be written (quota exceeded, disk full, locked).
    #[error("Failed to save '{key}': {message}")]
    Write { key: String, message: String },

    /// The backend itself is unavailable.
    #[error("Store backend unavailable: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_write(&self) -> bool {
        matches!(self, StoreError::Write { .. })
    }
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Journal entry with neither a title nor any content
    #[error("Journal entry needs a title or some content")]
    EmptyEntry,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Support chat errors.
///
/// `Upstream` deliberately renders as a generic message; the status code is
/// kept for logging.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("No API key configured (set chat.api_key or GOOGLE_AI_API_KEY)")]
    MissingApiKey,

    #[error("Failed to get AI response")]
    Upstream { status: u16, body: String },

    #[error("Failed to get AI response: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from AI service: {0}")]
    MalformedResponse(String),

    #[error("Invalid chat endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg)
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                StoreError::Backend("database is locked".into())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
