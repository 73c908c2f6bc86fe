//! Domain error types
//!
//! This module defines the error hierarchy for bxconfig. Load and save
//! failures never surface through the repository accessors; they are handed
//! to an injected [`ErrorHandler`] instead.

use std::sync::Arc;
use thiserror::Error;

/// Main bxconfig error type
///
/// This is the primary error type used throughout the crate.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The on-disk content is not valid JSON for the target shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// A value could not be serialized
    #[error("Encode error: {0}")]
    Encode(String),

    /// File missing, unreadable or unwritable
    #[error("I/O error: {0}")]
    Io(String),

    /// The OS refused access to the configuration file
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Plugin bootstrap errors
    #[error("Plugin error: {0}")]
    Plugin(String),

    /// File download errors
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Invalid tool configuration (paths, log level, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Downloader-specific errors
///
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The request could not be built or sent
    #[error("download request error: {0}")]
    Request(String),

    /// The server answered with anything other than 200
    #[error("Unexpected response code {status}")]
    UnexpectedStatus { status: u16 },

    /// The destination file is already present
    #[error("destination already exists: {0}")]
    FileExists(String),

    /// Writing the destination file failed
    #[error("failed to write {path}: {message}")]
    Io { path: String, message: String },
}

/// Callback receiving load/save failures
///
/// Invoked synchronously while the repository lock is held; the handler
/// decides whether the failure is fatal.
pub type ErrorHandler = Arc<dyn Fn(&SdkError) + Send + Sync>;

/// Handler used by the CLI and plugin bootstrap: logs and exits the process
pub fn fatal_error_handler() -> ErrorHandler {
    Arc::new(|err: &SdkError| {
        tracing::error!(error = %err, "Fatal configuration error");
        eprintln!("configuration error: {err}");
        std::process::exit(1);
    })
}

/// Handler that only logs, leaving the in-memory state in place
pub fn logging_error_handler() -> ErrorHandler {
    Arc::new(|err: &SdkError| {
        tracing::error!(error = %err, "Configuration persistence failed");
    })
}

// Conversion from std::io::Error
impl From<std::io::Error> for SdkError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            SdkError::PermissionDenied(err.to_string())
        } else {
            SdkError::Io(err.to_string())
        }
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            SdkError::Io(err.to_string())
        } else {
            SdkError::Decode(err.to_string())
        }
    }
}
