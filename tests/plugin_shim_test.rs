//! Integration tests for the plugin bootstrap
//!
//! Tests that point BLUEMIX_HOME at a temporary directory hold ENV_MUTEX.

use bxconfig::config::paths::ENV_BLUEMIX_HOME;
use bxconfig::plugin::{self, Plugin, PluginContext, PluginMetadata, VersionType};
use serde_json::{json, Value};
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<String>>,
}

impl Plugin for Recorder {
    fn metadata(&self) -> PluginMetadata {
        PluginMetadata {
            name: "recorder".to_string(),
            version: VersionType::new(1, 2, 3),
            ..PluginMetadata::default()
        }
    }

    fn run(&self, context: &PluginContext, args: &[String]) {
        let mut seen = self.seen.lock().unwrap();
        seen.push(context.core_config().region().name);
        seen.push(context.locale());
        seen.extend(args.iter().cloned());

        context
            .plugin_config()
            .set("LastArgs", args.len() as i64)
            .unwrap();
    }
}

#[test]
fn test_metadata_handshake() {
    let plugin = Recorder::default();
    let mut out: Vec<u8> = Vec::new();

    plugin::run(&plugin, &["SendMetadata".to_string()], &mut out).unwrap();

    let metadata: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(metadata["Name"], "recorder");
    assert_eq!(metadata["Version"], json!({"Major": 1, "Minor": 2, "Build": 3}));
    assert!(metadata["SDKVersion"]["Major"].is_u64());
    assert!(plugin.seen.lock().unwrap().is_empty());
}

#[test]
fn test_run_binds_shared_and_plugin_config() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let home = TempDir::new().unwrap();
    std::env::set_var(ENV_BLUEMIX_HOME, home.path());

    let config_dir = home.path().join(".bluemix");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.json"),
        json!({"Region": "us-south", "Locale": "en_US"}).to_string(),
    )
    .unwrap();

    let plugin = Recorder::default();
    let mut out: Vec<u8> = Vec::new();
    let result = plugin::run(
        &plugin,
        &["list".to_string(), "--all".to_string()],
        &mut out,
    );
    std::env::remove_var(ENV_BLUEMIX_HOME);

    result.unwrap();
    assert!(out.is_empty());
    assert_eq!(
        *plugin.seen.lock().unwrap(),
        vec!["us-south", "en_US", "list", "--all"]
    );

    let plugin_config = config_dir
        .join("plugins")
        .join("recorder")
        .join("config.json");
    let saved: Value = serde_json::from_slice(&fs::read(plugin_config).unwrap()).unwrap();
    assert_eq!(saved["LastArgs"], 2);
}
