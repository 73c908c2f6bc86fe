//! Structured logging setup using tracing
//!
//! Logs always go to stderr: stdout carries command output and the plugin
//! metadata handshake.

use crate::config::BxConfigData;
use crate::domain::{Result, SdkError};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format of the log layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `log_level_str` when set.
///
/// # Errors
///
/// Returns [`SdkError::Configuration`] if the level is unknown or a global
/// subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use bxconfig::logging::{init_logging, LogFormat};
///
/// init_logging("info", LogFormat::Text).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_logging(log_level_str: &str, format: LogFormat) -> Result<()> {
    let log_level = parse_log_level(log_level_str)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bxconfig={log_level}")));

    let layer = match format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| SdkError::Configuration(format!("Failed to initialize logging: {e}")))?;

    tracing::debug!(level = %log_level, format = ?format, "Logging initialized");
    Ok(())
}

/// Log level implied by the configuration's `Trace` setting
///
/// `"true"` turns on debug output; anything else keeps `default`.
pub fn level_for_trace<'a>(trace: &str, default: &'a str) -> &'a str {
    if trace.eq_ignore_ascii_case("true") {
        "debug"
    } else {
        default
    }
}

/// Log level implied by the `Trace` setting of the file at `path`
///
/// Reads the file directly so logging can be installed before the
/// repository loads it. An unreadable or malformed file yields `default`.
pub fn level_for_config_file(path: &Path, default: &str) -> String {
    let trace = std::fs::read(path)
        .ok()
        .and_then(|bytes| BxConfigData::decode(&bytes).ok())
        .map(|data| data.trace)
        .unwrap_or_default();
    level_for_trace(&trace, default).to_string()
}

/// Parse log level from string
fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(SdkError::Configuration(format!(
            "Invalid log level: {level_str}. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}
