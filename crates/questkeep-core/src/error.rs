//! Core error types for questkeep-core.
//!
//! Every fallible operation in the library reports one of these types.
//! Rejected timer edits are not errors; they return `None` instead.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for questkeep-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend request errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Credential storage errors
    #[error("Token store error: {0}")]
    TokenStore(#[from] TokenStoreError),

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

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be determined or created
    #[error("Data directory unavailable at {path}: {message}")]
    DataDir { path: PathBuf, message: String },

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
}

/// Errors returned by the backend client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend rejected the credentials (HTTP 401)
    #[error("Not authenticated with the backend")]
    Unauthorized,

    /// Any other non-success status
    #[error("Backend returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, timeout or body-decoding failure
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured base URL cannot be joined with an endpoint path
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors from the credential store.
#[derive(Error, Debug)]
pub enum TokenStoreError {
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Operation not allowed in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
