//! Per-plugin key/value settings
//!
//! Each plugin may keep arbitrary JSON values in its own file under the
//! plugin directory. The store follows the same rules as the core
//! repository: loaded once on first use, one reader/writer lock, saved
//! inside the write lock.

use crate::config::{DiskPersistor, Persistor, RawDocument};
use crate::domain::{ErrorHandler, Result};
use serde_json::Value;
use std::path::Path;
use std::sync::{Once, PoisonError, RwLock};

pub struct PluginConfig {
    data: RwLock<RawDocument>,
    persistor: Box<dyn Persistor>,
    init: Once,
    on_error: ErrorHandler,
}

impl PluginConfig {
    pub fn from_path(path: impl AsRef<Path>, on_error: ErrorHandler) -> Self {
        Self::from_persistor(DiskPersistor::new(path.as_ref()), on_error)
    }

    pub fn from_persistor(persistor: impl Persistor + 'static, on_error: ErrorHandler) -> Self {
        Self {
            data: RwLock::new(RawDocument::new()),
            persistor: Box::new(persistor),
            init: Once::new(),
            on_error,
        }
    }

    /// Loads once; a panicking handler still marks the load as done
    fn init(&self) {
        self.init.call_once_force(|state| {
            if state.is_poisoned() {
                return;
            }
            let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
            if let Err(err) = self.persistor.load(&mut *data) {
                tracing::warn!(error = %err, "Failed to load plugin configuration");
                (self.on_error)(&err);
            }
        });
    }

    fn read<T>(&self, f: impl FnOnce(&RawDocument) -> T) -> T {
        self.init();
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        f(&data)
    }

    fn write(&self, f: impl FnOnce(&mut RawDocument)) -> Result<()> {
        self.init();
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut data);
        self.persistor.save(&*data)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.read(|d| d.get(key).cloned())
    }

    pub fn exists(&self, key: &str) -> bool {
        self.read(|d| d.contains_key(key))
    }

    /// The value under `key` if it is a string
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    /// Stores `value` under `key` and saves the file
    ///
    /// # Errors
    ///
    /// Returns the persistor's error if the save fails; the in-memory value
    /// is kept.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.write(|d| {
            d.insert(key, value);
        })
    }

    /// Removes `key` and saves the file
    ///
    /// # Errors
    ///
    /// Returns the persistor's error if the save fails.
    pub fn erase(&self, key: &str) -> Result<()> {
        self.write(|d| {
            d.remove(key);
        })
    }
}
