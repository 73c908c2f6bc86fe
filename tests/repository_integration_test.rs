//! Integration tests for the disk-backed configuration repository

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bxconfig::config::BxConfigRepository;
use bxconfig::domain::{logging_error_handler, Account, ErrorHandler, PluginRepo, Region, SdkError};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

fn read_json(path: &Path) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

fn token_with_claims(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.sig")
}

fn recording_handler() -> (ErrorHandler, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler: ErrorHandler = Arc::new(move |err: &SdkError| {
        sink.lock().unwrap().push(err.to_string());
    });
    (handler, seen)
}

#[test]
fn test_missing_file_is_created_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".bluemix").join("config.json");

    let repo = BxConfigRepository::from_path(&path, logging_error_handler());
    assert_eq!(repo.region(), Region::default());
    assert!(path.exists());

    let on_disk = read_json(&path);
    assert_eq!(on_disk["IAMToken"], "");
    assert_eq!(on_disk["PluginRepos"], json!([]));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn test_unknown_keys_survive_full_write() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        json!({
            "Locale": "en_US",
            "SSLDisabled": true,
            "Extra": {"nested": [1, 2, 3]}
        })
        .to_string(),
    )
    .unwrap();

    let repo = BxConfigRepository::from_path(&path, logging_error_handler());
    repo.set_region(Region::new("ibm:yp:eu-de", "eu-de", "public"));

    let on_disk = read_json(&path);
    assert_eq!(on_disk["RegionID"], "ibm:yp:eu-de");
    assert_eq!(on_disk["Locale"], "en_US");
    assert_eq!(on_disk["SSLDisabled"], true);
    assert_eq!(on_disk["Extra"], json!({"nested": [1, 2, 3]}));
}

#[test]
fn test_token_write_keeps_other_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        json!({"Region": "us-south", "FutureField": "kept"}).to_string(),
    )
    .unwrap();

    let token = token_with_claims(json!({
        "iam_id": "IBMid-123",
        "account": {"bss": "acct-1", "ims": "ims-9"},
        "exp": 4_102_444_800i64
    }));

    let repo = BxConfigRepository::from_path(&path, logging_error_handler());
    repo.set_iam_token(token.as_str());
    repo.set_iam_refresh_token("refresh");

    let on_disk = read_json(&path);
    assert_eq!(on_disk["IAMToken"], token.as_str());
    assert_eq!(on_disk["IAMRefreshToken"], "refresh");
    assert_eq!(on_disk["Region"], "us-south");
    assert_eq!(on_disk["FutureField"], "kept");

    // A fresh repository sees the same claims
    let reopened = BxConfigRepository::from_path(&path, logging_error_handler());
    assert_eq!(reopened.iam_id(), "IBMid-123");
    assert_eq!(reopened.ims_account_id(), "ims-9");
    assert!(!reopened.iam_token_info().is_expired());
}

#[test]
fn test_changes_visible_to_new_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let repo = BxConfigRepository::from_path(&path, logging_error_handler());
    repo.set_account(Account {
        guid: "guid-1".to_string(),
        name: "Team".to_string(),
        owner: "owner@example.com".to_string(),
    });
    repo.set_plugin_repo(PluginRepo::new("stage", "https://stage.example.com"));
    repo.set_http_timeout(30);

    let reopened = BxConfigRepository::from_path(&path, logging_error_handler());
    assert!(reopened.has_account());
    assert_eq!(reopened.account().name, "Team");
    assert_eq!(
        reopened.plugin_repo("STAGE").map(|r| r.url),
        Some("https://stage.example.com".to_string())
    );
    assert_eq!(reopened.http_timeout(), 30);
}

#[test]
fn test_corrupt_file_reported_and_not_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{not json").unwrap();

    let (handler, seen) = recording_handler();
    let repo = BxConfigRepository::from_path(&path, handler);

    assert_eq!(repo.locale(), "");
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert!(seen.lock().unwrap()[0].contains("Decode"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
}

#[test]
fn test_null_collections_from_older_writers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"PluginRepos": null, "Account": null, "ResourceGroup": null, "Trace": "true"}"#,
    )
    .unwrap();

    let (handler, seen) = recording_handler();
    let repo = BxConfigRepository::from_path(&path, handler);

    assert!(repo.plugin_repos().is_empty());
    assert!(!repo.has_account());
    assert!(!repo.has_resource_group());
    assert_eq!(repo.trace(), "true");
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn test_concurrent_first_access() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, json!({"Locale": "fr_FR"}).to_string()).unwrap();

    let repo = Arc::new(BxConfigRepository::from_path(&path, logging_error_handler()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                assert_eq!(repo.locale(), "fr_FR");
                repo.set_plugin_repo(PluginRepo::new(format!("repo-{i}"), "https://x.example.com"));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(repo.plugin_repos().len(), 8);
    let on_disk = read_json(&path);
    assert_eq!(on_disk["PluginRepos"].as_array().map(Vec::len), Some(8));
    assert_eq!(on_disk["Locale"], "fr_FR");
}
