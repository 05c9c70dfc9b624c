//! Error Handling
//!
//! Unified error types for the recents store.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use recents_core::CoreError;
use thiserror::Error;

/// Store-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Errors raised by the core layer (key resolution, validation)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// File I/O errors: permissions, missing directory, disk full
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Document content present but not a valid versioned document
    #[error("Corrupt document {}: {}", .path.display(), .reason)]
    CorruptDocument { path: PathBuf, reason: String },

    /// The lock file could not be acquired within the timeout
    #[error("Timed out after {}ms waiting for lock {}", .waited_ms, .path.display())]
    LockTimeout { path: PathBuf, waited_ms: u64 },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// State used before `setup()`
    #[error("Not initialized: {0}")]
    NotInitialized(String),
}

/// Result type alias for store errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a corrupt document error
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not initialized error
    pub fn not_initialized(msg: impl Into<String>) -> Self {
        Self::NotInitialized(msg.into())
    }

    /// Whether the error came from lock contention rather than I/O or data
    pub fn is_lock_timeout(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }
}

/// Convert AppError to a string for callers that only log
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
