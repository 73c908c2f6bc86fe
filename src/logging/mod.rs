//! Logging and observability
//!
//! Structured logging through `tracing`, written to stderr as text or JSON.
//!
//! # Example
//!
//! ```no_run
//! use bxconfig::logging::{init_logging, LogFormat};
//!
//! init_logging("info", LogFormat::Json).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, level_for_config_file, level_for_trace, LogFormat};
