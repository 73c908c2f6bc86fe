//! Plugin process bootstrap
//!
//! A plugin binary hands itself to [`start`]. When the CLI asks for metadata
//! (`SendMetadata` as the only argument) the plugin's [`PluginMetadata`] is
//! written to stdout as JSON. Otherwise a [`PluginContext`] bound to the
//! shared configuration file is built and the plugin runs with it.
//!
//! # Example
//!
//! ```rust,no_run
//! use bxconfig::plugin::{self, Plugin, PluginContext, PluginMetadata};
//!
//! struct Hello;
//!
//! impl Plugin for Hello {
//!     fn metadata(&self) -> PluginMetadata {
//!         PluginMetadata { name: "hello".to_string(), ..PluginMetadata::default() }
//!     }
//!
//!     fn run(&self, context: &PluginContext, args: &[String]) {
//!         println!("region: {} args: {args:?}", context.core_config().region().name);
//!     }
//! }
//!
//! fn main() {
//!     if let Err(e) = plugin::start(&Hello) {
//!         eprintln!("{e}");
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod context;
pub mod metadata;
pub mod plugin_config;

pub use context::PluginContext;
pub use metadata::{sdk_version, Command, Flag, Namespace, PluginMetadata, VersionType};
pub use plugin_config::PluginConfig;

use crate::domain::{fatal_error_handler, Result, SdkError};
use std::io::Write;

/// Argument the CLI sends to request a plugin's metadata
pub const METADATA_REQUEST: &str = "SendMetadata";

/// Implemented by every plugin
pub trait Plugin {
    fn metadata(&self) -> PluginMetadata;

    fn run(&self, context: &PluginContext, args: &[String]);
}

/// Runs `plugin` with the process arguments, answering metadata requests on stdout
///
/// # Errors
///
/// Returns an error if the metadata cannot be written or the plugin context
/// cannot be located.
pub fn start<P: Plugin + ?Sized>(plugin: &P) -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = std::io::stdout();
    run(plugin, &args, &mut stdout.lock())
}

/// Runs `plugin` with `args`, writing metadata responses to `out`
///
/// # Errors
///
/// Returns an error if the metadata cannot be written or the plugin context
/// cannot be located.
pub fn run<P: Plugin + ?Sized>(plugin: &P, args: &[String], out: &mut dyn Write) -> Result<()> {
    if is_metadata_request(args) {
        return send_metadata(plugin, out);
    }

    let name = plugin.metadata().name;
    if name.is_empty() {
        return Err(SdkError::Plugin("plugin metadata has no name".to_string()));
    }

    let context = PluginContext::for_plugin(&name, fatal_error_handler())?;
    tracing::debug!(plugin = %name, locale = %context.locale(), "Starting plugin");

    plugin.run(&context, args);
    Ok(())
}

fn send_metadata<P: Plugin + ?Sized>(plugin: &P, out: &mut dyn Write) -> Result<()> {
    let metadata = fill_metadata(plugin.metadata());
    let json = serde_json::to_vec(&metadata).map_err(|e| SdkError::Encode(e.to_string()))?;
    out.write_all(&json)?;
    out.flush()?;
    Ok(())
}

fn fill_metadata(mut metadata: PluginMetadata) -> PluginMetadata {
    metadata.sdk_version = sdk_version();
    metadata
}

fn is_metadata_request(args: &[String]) -> bool {
    matches!(args, [only] if only == METADATA_REQUEST)
}
