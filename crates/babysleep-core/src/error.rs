//! Core error types for babysleep-core.
//!
//! All engine and trainer failures are local, synchronous, and
//! non-retryable; the caller decides how to surface them.

use std::path::PathBuf;

use chrono::NaiveTime;
use thiserror::Error;

/// Core error type for babysleep-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Training attempted with no historical records.
    #[error("Insufficient data: no historical records to train on")]
    InsufficientData,

    /// Prediction attempted before any successful training.
    #[error("Model not trained: run training before predicting")]
    ModelNotTrained,

    /// Correction references an event that is not in the current schedule.
    #[error("Unknown event '{target}' (valid events: {})", .valid.join(", "))]
    UnknownEvent { target: String, valid: Vec<String> },

    /// Correction would break the schedule's monotonic time ordering.
    #[error("Invalid time order for {event}: {start} is before {boundary}")]
    InvalidTimeOrder {
        event: String,
        start: NaiveTime,
        boundary: NaiveTime,
    },

    /// Time string that is not HH:MM.
    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    /// Date string that is not YYYY-MM-DD.
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A historical record violating the monotonic invariant.
    #[error("Invalid record for {date}: {message}")]
    InvalidRecord { date: String, message: String },

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Calendar sync errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read a store file
    #[error("Failed to load {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to write a store file
    #[error("Failed to save {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Data directory could not be resolved or created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(String),
}

/// Calendar-sync errors.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No usable token material on disk
    #[error("Not authenticated: place token.json in the data directory")]
    AuthenticationRequired,

    /// Network failure talking to the calendar API
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Calendar API returned a non-success status
    #[error("Calendar API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
