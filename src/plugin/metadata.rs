//! Plugin metadata handshake types
//!
//! The CLI discovers a plugin's commands by invoking it with the single
//! argument `SendMetadata`; the plugin answers with [`PluginMetadata`] as JSON
//! on stdout. Keys are PascalCase to match what the CLI expects.

use serde::{Deserialize, Serialize};

/// A `major.minor.build` version triple
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionType {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl VersionType {
    pub fn new(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build,
        }
    }
}

impl std::fmt::Display for VersionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

/// Version of this SDK, stamped into every metadata response
pub fn sdk_version() -> VersionType {
    VersionType::new(
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0),
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0),
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0),
    )
}

/// A command namespace contributed by a plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Namespace {
    pub name: String,
    pub description: String,
}

/// A flag accepted by a plugin command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Flag {
    pub name: String,
    pub description: String,
    pub has_value: bool,
    pub hidden: bool,
}

/// A command implemented by a plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Command {
    pub namespace: String,
    pub name: String,
    pub alias: String,
    pub description: String,
    pub usage: String,
    pub flags: Vec<Flag>,
    pub hidden: bool,
}

/// Everything the CLI needs to know about a plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PluginMetadata {
    pub name: String,
    pub version: VersionType,
    pub min_cli_version: VersionType,
    pub namespaces: Vec<Namespace>,
    pub commands: Vec<Command>,
    #[serde(rename = "SDKVersion")]
    pub sdk_version: VersionType,
}
