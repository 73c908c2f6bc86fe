//! The configuration document
//!
//! [`BxConfigData`] is the strict schema of every known configuration field.
//! Alongside it lives a [`RawDocument`]: the same file decoded into an open
//! JSON object. Keys written by a newer CLI that this schema does not know
//! survive in the raw document, and [`BxConfigData::marshal`] writes them back
//! after the known fields.

use super::persistor::DataInterface;
use super::secret::{secret_string, SecretString};
use crate::domain::models::{Account, PluginRepo, ResourceGroup};
use crate::domain::{Result, SdkError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Untyped view of the configuration file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDocument(Map<String, Value>);

impl RawDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Overwrites every key present in `known`, keeping all other keys
    fn overlay(&mut self, known: Map<String, Value>) {
        for (key, value) in known {
            self.0.insert(key, value);
        }
    }
}

impl DataInterface for RawDocument {
    fn marshal(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.0).map_err(|e| SdkError::Encode(e.to_string()))
    }

    fn unmarshal(&mut self, bytes: &[u8]) -> Result<()> {
        self.0 = serde_json::from_slice(bytes)?;
        Ok(())
    }
}

/// Typed configuration snapshot
///
/// Field order here is the key order in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BxConfigData {
    #[serde(rename = "ConsoleEndpoint")]
    pub console_endpoint: String,

    /// Region display name
    #[serde(rename = "Region")]
    pub region: String,

    #[serde(rename = "RegionID")]
    pub region_id: String,

    #[serde(rename = "RegionType")]
    pub region_type: String,

    #[serde(rename = "IAMEndpoint")]
    pub iam_endpoint: String,

    #[serde(rename = "IAMToken")]
    pub iam_token: SecretString,

    #[serde(rename = "IAMRefreshToken")]
    pub iam_refresh_token: SecretString,

    #[serde(rename = "Account", deserialize_with = "null_as_default")]
    pub account: Account,

    #[serde(rename = "ResourceGroup", deserialize_with = "null_as_default")]
    pub resource_group: ResourceGroup,

    #[serde(rename = "PluginRepos", deserialize_with = "null_as_default")]
    pub plugin_repos: Vec<PluginRepo>,

    #[serde(rename = "Locale")]
    pub locale: String,

    #[serde(rename = "Trace")]
    pub trace: String,

    /// `"true"`, `"false"` or empty for "auto"
    #[serde(rename = "ColorEnabled")]
    pub color_enabled: String,

    /// Seconds
    #[serde(rename = "HTTPTimeout")]
    pub http_timeout: i64,

    #[serde(rename = "CLIInfoEndpoint")]
    pub cli_info_endpoint: String,

    #[serde(rename = "CheckCLIVersionDisabled")]
    pub check_cli_version_disabled: bool,

    #[serde(rename = "UsageStatsDisabled")]
    pub usage_stats_disabled: bool,

    #[serde(skip)]
    raw: RawDocument,
}

impl Default for BxConfigData {
    fn default() -> Self {
        Self {
            console_endpoint: String::new(),
            region: String::new(),
            region_id: String::new(),
            region_type: String::new(),
            iam_endpoint: String::new(),
            iam_token: secret_string(""),
            iam_refresh_token: secret_string(""),
            account: Account::default(),
            resource_group: ResourceGroup::default(),
            plugin_repos: Vec::new(),
            locale: String::new(),
            trace: String::new(),
            color_enabled: String::new(),
            http_timeout: 0,
            cli_info_endpoint: String::new(),
            check_cli_version_disabled: false,
            usage_stats_disabled: false,
            raw: RawDocument::new(),
        }
    }
}

impl BxConfigData {
    /// Creates an empty document whose raw view already holds every known key
    pub fn new() -> Self {
        let mut data = Self::default();
        // Known fields of a default document always serialize.
        if let Err(e) = data.sync_raw() {
            tracing::warn!(error = %e, "Failed to seed raw configuration view");
        }
        data
    }

    /// Decodes a document from `bytes`
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Decode`] if `bytes` is not a JSON object matching
    /// the schema.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut data = Self::new();
        data.unmarshal(bytes)?;
        Ok(data)
    }

    /// The raw view of the document
    pub fn raw(&self) -> &RawDocument {
        &self.raw
    }

    /// Sets a single raw key without touching any other raw key
    pub(crate) fn set_raw(&mut self, key: &str, value: impl Into<Value>) {
        self.raw.insert(key, value);
    }

    /// Rewrites every known key of the raw view from the typed fields
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Encode`] if a field fails to serialize.
    pub fn sync_raw(&mut self) -> Result<()> {
        let known = self.known_fields()?;
        self.raw.overlay(known);
        Ok(())
    }

    fn known_fields(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self).map_err(|e| SdkError::Encode(e.to_string()))? {
            Value::Object(map) => Ok(map),
            other => Err(SdkError::Encode(format!(
                "configuration serialized to {other} instead of an object"
            ))),
        }
    }
}

impl DataInterface for BxConfigData {
    /// Known fields in declaration order, then raw keys the schema lacks
    fn marshal(&self) -> Result<Vec<u8>> {
        let mut document = self.known_fields()?;
        for (key, value) in self.raw.as_map() {
            if !document.contains_key(key) {
                document.insert(key.clone(), value.clone());
            }
        }
        serde_json::to_vec_pretty(&document).map_err(|e| SdkError::Encode(e.to_string()))
    }

    fn unmarshal(&mut self, bytes: &[u8]) -> Result<()> {
        let typed: BxConfigData = serde_json::from_slice(bytes)?;
        let mut raw = RawDocument::new();
        raw.unmarshal(bytes)?;

        *self = typed;
        self.raw = raw;
        Ok(())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
