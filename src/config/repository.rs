//! The shared configuration repository
//!
//! [`BxConfigRepository`] owns one [`BxConfigData`] for its whole lifetime.
//! The first call to any accessor loads it from the [`Persistor`] exactly
//! once; afterwards every read takes the shared lock and every write takes
//! the exclusive lock, mutates the document, and persists it before the lock
//! is released.
//!
//! Load and save failures never reach the caller. They go to the injected
//! [`ErrorHandler`], and a failed save does not roll back the in-memory
//! change.
//!
//! # Example
//!
//! ```rust
//! use bxconfig::config::{BxConfigRepository, MemoryPersistor};
//! use bxconfig::domain::{logging_error_handler, PluginRepo};
//!
//! let repo = BxConfigRepository::from_persistor(MemoryPersistor::new(), logging_error_handler());
//! repo.set_plugin_repo(PluginRepo::new("foo", "https://plugins.example.com"));
//!
//! assert!(repo.plugin_repo("FOO").is_some());
//! ```

use super::document::BxConfigData;
use super::persistor::{DiskPersistor, Persistor};
use super::secret::secret_string;
use crate::domain::models::{cloud_name, Account, PluginRepo, Region, ResourceGroup};
use crate::domain::token::IamTokenInfo;
use crate::domain::{ErrorHandler, SdkError};
use secrecy::ExposeSecret;
use std::path::Path;
use std::sync::{Once, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const RAW_IAM_TOKEN: &str = "IAMToken";
const RAW_IAM_REFRESH_TOKEN: &str = "IAMRefreshToken";

/// Lock-protected, lazily loaded, persisted configuration
pub struct BxConfigRepository {
    data: RwLock<BxConfigData>,
    persistor: Box<dyn Persistor>,
    init: Once,
    on_error: ErrorHandler,
}

impl BxConfigRepository {
    /// Repository backed by the JSON file at `path`
    pub fn from_path(path: impl AsRef<Path>, on_error: ErrorHandler) -> Self {
        Self::from_persistor(DiskPersistor::new(path.as_ref()), on_error)
    }

    /// Repository backed by any persistor
    pub fn from_persistor(persistor: impl Persistor + 'static, on_error: ErrorHandler) -> Self {
        Self {
            data: RwLock::new(BxConfigData::new()),
            persistor: Box::new(persistor),
            init: Once::new(),
            on_error,
        }
    }

    /// Loads the document on first use
    ///
    /// Concurrent first callers block until the single load finishes. A
    /// handler that panics still leaves the repository loaded; the load is
    /// never retried.
    fn init(&self) {
        self.init.call_once_force(|state| {
            if state.is_poisoned() {
                return;
            }
            let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
            if let Err(err) = self.persistor.load(&mut *data) {
                self.report(&err);
            }
        });
    }

    fn report(&self, err: &SdkError) {
        tracing::warn!(error = %err, "Configuration persistence error");
        (self.on_error)(err);
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, BxConfigData> {
        self.init();
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, BxConfigData> {
        self.init();
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<T>(&self, f: impl FnOnce(&BxConfigData) -> T) -> T {
        let data = self.read_guard();
        f(&data)
    }

    /// Mutates the document, refreshes its raw view and saves the whole document
    fn write(&self, f: impl FnOnce(&mut BxConfigData)) {
        let mut data = self.write_guard();
        f(&mut data);

        if let Err(err) = data.sync_raw() {
            self.report(&err);
            return;
        }
        if let Err(err) = self.persistor.save(&*data) {
            self.report(&err);
        }
    }

    /// Mutates the document and saves only its raw view
    fn write_raw(&self, f: impl FnOnce(&mut BxConfigData)) {
        let mut data = self.write_guard();
        f(&mut data);

        if let Err(err) = self.persistor.save(data.raw()) {
            self.report(&err);
        }
    }

    pub fn console_endpoint(&self) -> String {
        self.read(|d| d.console_endpoint.clone())
    }

    pub fn region(&self) -> Region {
        self.read(|d| Region::new(&d.region_id, &d.region, &d.region_type))
    }

    /// Cloud name derived from the region id, e.g. `bluemix` or `staging`
    pub fn cloud_name(&self) -> String {
        self.read(|d| cloud_name(&d.region_id).to_string())
    }

    pub fn cloud_type(&self) -> String {
        self.read(|d| d.region_type.clone())
    }

    pub fn iam_endpoint(&self) -> String {
        self.read(|d| d.iam_endpoint.clone())
    }

    /// IAM subject id decoded from the access token
    pub fn iam_id(&self) -> String {
        self.iam_token_info().iam_id
    }

    /// IMS account id decoded from the access token
    pub fn ims_account_id(&self) -> String {
        self.iam_token_info().accounts.ims_account_id
    }

    pub fn iam_token_info(&self) -> IamTokenInfo {
        self.read(|d| IamTokenInfo::parse(d.iam_token.expose_secret().expose()))
    }

    pub fn iam_token(&self) -> String {
        self.read(|d| d.iam_token.expose_secret().expose().to_string())
    }

    pub fn iam_refresh_token(&self) -> String {
        self.read(|d| d.iam_refresh_token.expose_secret().expose().to_string())
    }

    pub fn account(&self) -> Account {
        self.read(|d| d.account.clone())
    }

    pub fn has_account(&self) -> bool {
        self.read(|d| !d.account.guid.is_empty())
    }

    pub fn resource_group(&self) -> ResourceGroup {
        self.read(|d| d.resource_group.clone())
    }

    pub fn has_resource_group(&self) -> bool {
        self.read(|d| !d.resource_group.guid.is_empty() && !d.resource_group.name.is_empty())
    }

    pub fn plugin_repos(&self) -> Vec<PluginRepo> {
        self.read(|d| d.plugin_repos.clone())
    }

    /// First repository whose name matches case-insensitively
    pub fn plugin_repo(&self, name: &str) -> Option<PluginRepo> {
        self.read(|d| d.plugin_repos.iter().find(|r| r.matches(name)).cloned())
    }

    pub fn locale(&self) -> String {
        self.read(|d| d.locale.clone())
    }

    pub fn trace(&self) -> String {
        self.read(|d| d.trace.clone())
    }

    pub fn color_enabled(&self) -> String {
        self.read(|d| d.color_enabled.clone())
    }

    /// HTTP timeout in seconds
    pub fn http_timeout(&self) -> i64 {
        self.read(|d| d.http_timeout)
    }

    pub fn cli_info_endpoint(&self) -> String {
        self.read(|d| d.cli_info_endpoint.clone())
    }

    pub fn check_cli_version_disabled(&self) -> bool {
        self.read(|d| d.check_cli_version_disabled)
    }

    pub fn usage_stats_disabled(&self) -> bool {
        self.read(|d| d.usage_stats_disabled)
    }

    pub fn set_console_endpoint(&self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        self.write(|d| d.console_endpoint = endpoint);
    }

    pub fn set_region(&self, region: Region) {
        self.write(|d| {
            d.region = region.name;
            d.region_id = region.id;
            d.region_type = region.region_type;
        });
    }

    pub fn set_iam_endpoint(&self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        self.write(|d| d.iam_endpoint = endpoint);
    }

    /// Updates the access token, leaving every other stored key untouched
    pub fn set_iam_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.write_raw(|d| {
            d.set_raw(RAW_IAM_TOKEN, token.as_str());
            d.iam_token = secret_string(token);
        });
    }

    /// Updates the refresh token, leaving every other stored key untouched
    pub fn set_iam_refresh_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.write_raw(|d| {
            d.set_raw(RAW_IAM_REFRESH_TOKEN, token.as_str());
            d.iam_refresh_token = secret_string(token);
        });
    }

    pub fn set_account(&self, account: Account) {
        self.write(|d| d.account = account);
    }

    pub fn set_resource_group(&self, group: ResourceGroup) {
        self.write(|d| d.resource_group = group);
    }

    /// Appends a repository registration
    ///
    /// Existing entries with the same name are kept; lookups return the
    /// earliest match.
    pub fn set_plugin_repo(&self, repo: PluginRepo) {
        self.write(|d| d.plugin_repos.push(repo));
    }

    /// Removes the first repository whose name matches case-insensitively
    pub fn unset_plugin_repo(&self, name: &str) {
        self.write(|d| {
            if let Some(pos) = d.plugin_repos.iter().position(|r| r.matches(name)) {
                d.plugin_repos.remove(pos);
            }
        });
    }

    pub fn set_locale(&self, locale: impl Into<String>) {
        let locale = locale.into();
        self.write(|d| d.locale = locale);
    }

    pub fn set_trace(&self, trace: impl Into<String>) {
        let trace = trace.into();
        self.write(|d| d.trace = trace);
    }

    pub fn set_color_enabled(&self, enabled: impl Into<String>) {
        let enabled = enabled.into();
        self.write(|d| d.color_enabled = enabled);
    }

    pub fn set_http_timeout(&self, timeout: i64) {
        self.write(|d| d.http_timeout = timeout);
    }

    pub fn set_cli_info_endpoint(&self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        self.write(|d| d.cli_info_endpoint = endpoint);
    }

    pub fn set_check_cli_version_disabled(&self, disabled: bool) {
        self.write(|d| d.check_cli_version_disabled = disabled);
    }

    pub fn set_usage_stats_disabled(&self, disabled: bool) {
        self.write(|d| d.usage_stats_disabled = disabled);
    }

    /// Forgets tokens, account and resource group (logout)
    pub fn clear_session(&self) {
        self.write(|d| {
            d.iam_token = secret_string("");
            d.iam_refresh_token = secret_string("");
            d.account = Account::default();
            d.resource_group = ResourceGroup::default();
        });
    }

    /// Forgets region and endpoints (switching environments)
    pub fn clear_api_cache(&self) {
        self.write(|d| {
            d.region.clear();
            d.region_id.clear();
            d.region_type.clear();
            d.console_endpoint.clear();
            d.iam_endpoint.clear();
        });
    }
}

impl std::fmt::Debug for BxConfigRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BxConfigRepository")
            .field("initialized", &self.init.is_completed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryPersistor;
    use crate::domain::logging_error_handler;
    use crate::domain::token::encode_test_token;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use test_case::test_case;

    fn repo_with(bytes: serde_json::Value) -> (BxConfigRepository, Arc<MemoryPersistor>) {
        let store = Arc::new(MemoryPersistor::with_bytes(bytes.to_string()));
        let repo = BxConfigRepository::from_persistor(Arc::clone(&store), logging_error_handler());
        (repo, store)
    }

    fn recording_handler() -> (ErrorHandler, Arc<Mutex<Vec<String>>>) {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&errors);
        let handler: ErrorHandler = Arc::new(move |e: &SdkError| {
            sink.lock().unwrap().push(e.to_string());
        });
        (handler, errors)
    }

    #[test_case("ibm:yp:us-south", "bluemix" ; "production")]
    #[test_case("ibm:ys1:eu-gb", "staging" ; "staging")]
    #[test_case("ibm:prod:us-south", "" ; "unknown ibm deployment")]
    #[test_case("softlayer:yp:dal", "softlayer" ; "other customer")]
    #[test_case("", "" ; "empty id")]
    #[test_case("a:b", "" ; "two segments")]
    fn test_cloud_name(region_id: &str, expected: &str) {
        let (repo, _) = repo_with(json!({"RegionID": region_id}));
        assert_eq!(repo.cloud_name(), expected);
    }

    #[test]
    fn test_cloud_type_is_region_type() {
        let (repo, _) = repo_with(json!({"RegionType": "dedicated"}));
        assert_eq!(repo.cloud_type(), "dedicated");
    }

    #[test]
    fn test_region_composed_from_three_fields() {
        let (repo, store) = repo_with(json!({}));
        repo.set_region(Region::new("ibm:yp:eu-de", "eu-de", "public"));

        assert_eq!(repo.region(), Region::new("ibm:yp:eu-de", "eu-de", "public"));
        let saved = store.json().unwrap();
        assert_eq!(saved["Region"], "eu-de");
        assert_eq!(saved["RegionID"], "ibm:yp:eu-de");
        assert_eq!(saved["RegionType"], "public");
    }

    #[test]
    fn test_lazy_load_happens_on_first_access() {
        let (repo, store) = repo_with(json!({"Locale": "fr_FR"}));
        assert_eq!(store.load_count(), 0);

        assert_eq!(repo.locale(), "fr_FR");
        assert_eq!(repo.locale(), "fr_FR");
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn test_plugin_repo_case_insensitive() {
        let (repo, _) = repo_with(json!({}));
        repo.set_plugin_repo(PluginRepo::new("foo", "https://foo.example.com"));

        let found = repo.plugin_repo("Foo").unwrap();
        assert_eq!(found.url, "https://foo.example.com");

        repo.unset_plugin_repo("FOO");
        assert!(repo.plugin_repo("foo").is_none());
        assert!(repo.plugin_repos().is_empty());
    }

    #[test]
    fn test_set_plugin_repo_keeps_duplicates() {
        let (repo, _) = repo_with(json!({}));
        repo.set_plugin_repo(PluginRepo::new("dup", "https://one.example.com"));
        repo.set_plugin_repo(PluginRepo::new("DUP", "https://two.example.com"));

        assert_eq!(repo.plugin_repos().len(), 2);
        assert_eq!(repo.plugin_repo("dup").unwrap().url, "https://one.example.com");

        repo.unset_plugin_repo("dup");
        assert_eq!(repo.plugin_repo("dup").unwrap().url, "https://two.example.com");
    }

    #[test]
    fn test_unset_missing_plugin_repo_is_noop() {
        let (repo, _) = repo_with(json!({"PluginRepos": [{"Name": "a", "URL": "u"}]}));
        repo.unset_plugin_repo("b");
        assert_eq!(repo.plugin_repos(), vec![PluginRepo::new("a", "u")]);
    }

    #[test]
    fn test_token_updates_preserve_unknown_keys() {
        let (repo, store) = repo_with(json!({
            "IAMToken": "old",
            "Locale": "en_US",
            "FromNewerRelease": {"enabled": true}
        }));

        repo.set_iam_token("tok1");
        repo.set_iam_token("tok2");

        assert_eq!(repo.iam_token(), "tok2");
        let saved = store.json().unwrap();
        assert_eq!(saved["IAMToken"], "tok2");
        assert_eq!(saved["FromNewerRelease"], json!({"enabled": true}));
        assert_eq!(saved["Locale"], "en_US");
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn test_refresh_token_uses_raw_path() {
        let (repo, store) = repo_with(json!({"Unknown": 1}));
        repo.set_iam_refresh_token("refresh-1");

        assert_eq!(repo.iam_refresh_token(), "refresh-1");
        let saved = store.json().unwrap();
        assert_eq!(saved["IAMRefreshToken"], "refresh-1");
        assert_eq!(saved["Unknown"], 1);
        // Raw path persists exactly the raw view, so unset known keys stay absent.
        assert!(saved.get("Locale").is_none());
    }

    #[test]
    fn test_full_write_keeps_unknown_keys() {
        let (repo, store) = repo_with(json!({"Unknown": "keep", "Trace": "false"}));
        repo.set_trace("true");

        let saved = store.json().unwrap();
        assert_eq!(saved["Trace"], "true");
        assert_eq!(saved["Unknown"], "keep");
    }

    #[test]
    fn test_full_write_after_token_write_keeps_token() {
        let (repo, store) = repo_with(json!({}));
        repo.set_iam_token("tok");
        repo.set_locale("ja_JP");

        let saved = store.json().unwrap();
        assert_eq!(saved["IAMToken"], "tok");
        assert_eq!(saved["Locale"], "ja_JP");
    }

    #[test]
    fn test_clear_session() {
        let (repo, _) = repo_with(json!({
            "IAMToken": "a",
            "IAMRefreshToken": "r",
            "Account": {"GUID": "acct"},
            "ResourceGroup": {"GUID": "rg", "Name": "default"},
            "RegionID": "ibm:yp:us-south",
            "ConsoleEndpoint": "https://cloud.example.com"
        }));
        assert!(repo.has_account());
        assert!(repo.has_resource_group());

        repo.clear_session();

        assert_eq!(repo.iam_token(), "");
        assert_eq!(repo.iam_refresh_token(), "");
        assert!(!repo.has_account());
        assert!(!repo.has_resource_group());
        assert_eq!(repo.region().id, "ibm:yp:us-south");
        assert_eq!(repo.console_endpoint(), "https://cloud.example.com");
    }

    #[test]
    fn test_clear_api_cache() {
        let (repo, _) = repo_with(json!({
            "IAMToken": "a",
            "IAMRefreshToken": "r",
            "Region": "us-south",
            "RegionID": "ibm:yp:us-south",
            "RegionType": "public",
            "ConsoleEndpoint": "https://cloud.example.com",
            "IAMEndpoint": "https://iam.example.com"
        }));

        repo.clear_api_cache();

        assert_eq!(repo.region(), Region::default());
        assert_eq!(repo.cloud_type(), "");
        assert_eq!(repo.console_endpoint(), "");
        assert_eq!(repo.iam_endpoint(), "");
        assert_eq!(repo.iam_token(), "a");
        assert_eq!(repo.iam_refresh_token(), "r");
    }

    #[test]
    fn test_has_resource_group_needs_guid_and_name() {
        let (repo, _) = repo_with(json!({"ResourceGroup": {"GUID": "rg"}}));
        assert!(!repo.has_resource_group());
    }

    #[test]
    fn test_iam_id_from_token() {
        let token = encode_test_token(&json!({
            "iam_id": "IBMid-42",
            "account": {"ims": "1234"}
        }));
        let (repo, _) = repo_with(json!({"IAMToken": token}));

        assert_eq!(repo.iam_id(), "IBMid-42");
        assert_eq!(repo.ims_account_id(), "1234");
    }

    #[test]
    fn test_scalar_setters_round_trip() {
        let (repo, store) = repo_with(json!({}));
        repo.set_console_endpoint("https://console");
        repo.set_iam_endpoint("https://iam");
        repo.set_color_enabled("false");
        repo.set_http_timeout(90);
        repo.set_cli_info_endpoint("https://info");
        repo.set_check_cli_version_disabled(true);
        repo.set_usage_stats_disabled(true);
        repo.set_account(Account {
            guid: "g".to_string(),
            name: "n".to_string(),
            owner: "o".to_string(),
        });
        repo.set_resource_group(ResourceGroup {
            guid: "rg".to_string(),
            name: "default".to_string(),
            ..ResourceGroup::default()
        });

        assert_eq!(repo.console_endpoint(), "https://console");
        assert_eq!(repo.iam_endpoint(), "https://iam");
        assert_eq!(repo.color_enabled(), "false");
        assert_eq!(repo.http_timeout(), 90);
        assert_eq!(repo.cli_info_endpoint(), "https://info");
        assert!(repo.check_cli_version_disabled());
        assert!(repo.usage_stats_disabled());
        assert_eq!(repo.account().owner, "o");
        assert!(repo.has_resource_group());

        let saved = store.json().unwrap();
        assert_eq!(saved["HTTPTimeout"], 90);
        assert_eq!(saved["Account"]["GUID"], "g");
    }

    #[test]
    fn test_load_error_goes_to_handler_once() {
        let (handler, errors) = recording_handler();
        let repo = BxConfigRepository::from_persistor(MemoryPersistor::with_bytes("{oops"), handler);

        assert_eq!(repo.locale(), "");
        assert_eq!(repo.trace(), "");

        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Decode error"));
    }

    #[test]
    fn test_panicking_load_handler_leaves_repository_usable() {
        let store = Arc::new(MemoryPersistor::with_bytes("{oops"));
        let handler: ErrorHandler = Arc::new(|e: &SdkError| panic!("fatal: {e}"));
        let repo = BxConfigRepository::from_persistor(Arc::clone(&store), handler);

        let first = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| repo.locale()));
        assert!(first.is_err());

        assert_eq!(repo.locale(), "");
        repo.set_locale("en_US");
        assert_eq!(repo.locale(), "en_US");
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn test_save_error_keeps_in_memory_change() {
        let (handler, errors) = recording_handler();
        let repo = BxConfigRepository::from_persistor(MemoryPersistor::new().failing_saves(), handler);

        repo.set_locale("es_ES");

        assert_eq!(repo.locale(), "es_ES");
        assert_eq!(errors.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let store = Arc::new(MemoryPersistor::with_bytes(json!({"Locale": "en_US"}).to_string()));
        let repo = Arc::new(BxConfigRepository::from_persistor(
            Arc::clone(&store),
            logging_error_handler(),
        ));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        assert_eq!(repo.locale(), "en_US");
                    } else {
                        repo.set_trace("true");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn test_readers_never_see_partial_region() {
        let (repo, _) = repo_with(json!({}));
        let repo = Arc::new(repo);
        let inconsistent = Arc::new(AtomicUsize::new(0));

        let writer = {
            let repo = Arc::clone(&repo);
            std::thread::spawn(move || {
                for i in 0..200 {
                    let tag = format!("r{i}");
                    repo.set_region(Region::new(
                        format!("ibm:yp:{tag}"),
                        tag.clone(),
                        format!("type-{tag}"),
                    ));
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let repo = Arc::clone(&repo);
                let inconsistent = Arc::clone(&inconsistent);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let region = repo.region();
                        if region.id.is_empty() {
                            continue;
                        }
                        let consistent = region.id == format!("ibm:yp:{}", region.name)
                            && region.region_type == format!("type-{}", region.name);
                        if !consistent {
                            inconsistent.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(inconsistent.load(Ordering::SeqCst), 0);
    }
}
