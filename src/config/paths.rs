//! Well-known configuration locations
//!
//! Everything lives under `<home>/.bluemix`, where `<home>` is `$BLUEMIX_HOME`
//! when set and the user's home directory otherwise.

use crate::domain::{Result, SdkError};
use std::path::PathBuf;

/// Environment variable overriding the home directory
pub const ENV_BLUEMIX_HOME: &str = "BLUEMIX_HOME";

const CONFIG_DIR_NAME: &str = ".bluemix";
const CONFIG_FILE_NAME: &str = "config.json";
const PLUGINS_DIR_NAME: &str = "plugins";

fn home_dir() -> Result<PathBuf> {
    match std::env::var_os(ENV_BLUEMIX_HOME) {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
        _ => dirs::home_dir().ok_or_else(|| {
            SdkError::Configuration(format!(
                "Cannot determine home directory; set {ENV_BLUEMIX_HOME}"
            ))
        }),
    }
}

/// `<home>/.bluemix`
pub fn config_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(CONFIG_DIR_NAME))
}

/// `<home>/.bluemix/config.json`
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// `<home>/.bluemix/plugins`
pub fn plugin_repo_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join(PLUGINS_DIR_NAME))
}

/// `<home>/.bluemix/plugins/<name>`
pub fn plugin_dir(plugin_name: &str) -> Result<PathBuf> {
    Ok(plugin_repo_dir()?.join(plugin_name))
}

/// `<home>/.bluemix/plugins/<name>/config.json`
pub fn plugin_config_path(plugin_name: &str) -> Result<PathBuf> {
    Ok(plugin_dir(plugin_name)?.join(CONFIG_FILE_NAME))
}
