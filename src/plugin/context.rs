//! The capability handed to plugin code
//!
//! A [`PluginContext`] gives a plugin read/write access to the shared CLI
//! configuration through the repository's public accessors, plus a private
//! key/value store of its own.

use super::plugin_config::PluginConfig;
use crate::config::{paths, BxConfigRepository};
use crate::domain::{ErrorHandler, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct PluginContext {
    core_config: Arc<BxConfigRepository>,
    plugin_config: PluginConfig,
    plugin_dir: PathBuf,
}

impl PluginContext {
    /// Assembles a context from its parts
    pub fn new(
        core_config: Arc<BxConfigRepository>,
        plugin_config: PluginConfig,
        plugin_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            core_config,
            plugin_config,
            plugin_dir: plugin_dir.into(),
        }
    }

    /// Context for `plugin_name` using the well-known file locations
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SdkError::Configuration`] if the home
    /// directory cannot be determined.
    pub fn for_plugin(plugin_name: &str, on_error: ErrorHandler) -> Result<Self> {
        let core = BxConfigRepository::from_path(paths::config_file_path()?, Arc::clone(&on_error));
        let plugin_config = PluginConfig::from_path(paths::plugin_config_path(plugin_name)?, on_error);
        Ok(Self::new(Arc::new(core), plugin_config, paths::plugin_dir(plugin_name)?))
    }

    /// The shared CLI configuration
    pub fn core_config(&self) -> &BxConfigRepository {
        &self.core_config
    }

    /// This plugin's own settings
    pub fn plugin_config(&self) -> &PluginConfig {
        &self.plugin_config
    }

    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    pub fn locale(&self) -> String {
        self.core_config.locale()
    }

    pub fn trace(&self) -> String {
        self.core_config.trace()
    }

    /// Explicit color choice; `None` means "decide from the terminal"
    pub fn color_enabled(&self) -> Option<bool> {
        match self.core_config.color_enabled().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// HTTP timeout in seconds, `None` when unset
    pub fn http_timeout(&self) -> Option<u64> {
        u64::try_from(self.core_config.http_timeout())
            .ok()
            .filter(|secs| *secs > 0)
    }

    pub fn is_logged_in(&self) -> bool {
        !self.core_config.iam_token().is_empty()
    }
}
