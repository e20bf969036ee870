//! Core error types for pausely-core.
//!
//! Each subsystem gets its own error enum; `CoreError` is the umbrella
//! type returned by the public API.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Core error type for pausely-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Durable-store errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote sync errors
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// Journal view errors
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Durable key-value store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the store
    #[error("failed to open store at {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// A read from the store failed
    #[error("failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// A write to the store failed
    #[error("failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// A write reported success but the read-back disagrees.
    /// Raised by the note-attachment verification step.
    #[error("read-back verification failed for session started at {start}")]
    VerificationMismatch { start: DateTime<Utc> },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Remote synchronization errors. Both variants are non-fatal to the
/// local session flow: the caller logs them and moves on.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No auth token is stored; the session stays local.
    #[error("no auth token stored; session not synced")]
    Unavailable,

    /// The upload was attempted and failed (network or server).
    #[error("sync request failed: {0}")]
    Failure(String),
}

/// Journal view errors.
#[derive(Error, Debug)]
pub enum JournalError {
    /// An edit/delete addressed an index beyond the journal view.
    #[error("index {index} out of bounds for journal view (length: {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
