//! Load/save abstraction for configuration documents
//!
//! A [`Persistor`] moves the encoded form of a [`DataInterface`] to and from
//! durable storage. [`DiskPersistor`] targets a single JSON file;
//! [`MemoryPersistor`] keeps the bytes in memory for tests.

use crate::domain::{Result, SdkError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A value that can encode itself to bytes and decode itself from bytes
pub trait DataInterface {
    /// Encodes the value
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Encode`] if serialization fails.
    fn marshal(&self) -> Result<Vec<u8>>;

    /// Replaces the value with the decoded `bytes`
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Decode`] if `bytes` is not valid for this value.
    fn unmarshal(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Storage capability used by the repositories
pub trait Persistor: Send + Sync {
    /// Whether anything has been persisted yet
    fn exists(&self) -> bool;

    /// Loads the stored bytes into `data`
    fn load(&self, data: &mut dyn DataInterface) -> Result<()>;

    /// Stores the encoded form of `data`
    fn save(&self, data: &dyn DataInterface) -> Result<()>;
}

impl<P: Persistor + ?Sized> Persistor for Arc<P> {
    fn exists(&self) -> bool {
        (**self).exists()
    }

    fn load(&self, data: &mut dyn DataInterface) -> Result<()> {
        (**self).load(data)
    }

    fn save(&self, data: &dyn DataInterface) -> Result<()> {
        (**self).save(data)
    }
}

/// File-backed persistor
///
/// Loading a missing file writes the current (default) value instead, so the
/// file exists after the first access. A permission failure is reported and
/// the file is left alone; so is a file that fails to decode.
#[derive(Debug, Clone)]
pub struct DiskPersistor {
    file_path: PathBuf,
}

impl DiskPersistor {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read(&self, data: &mut dyn DataInterface) -> Result<()> {
        self.ensure_parent_dir()?;
        let bytes = fs::read(&self.file_path)?;
        data.unmarshal(&bytes)
    }

    fn write(&self, data: &dyn DataInterface) -> Result<()> {
        let bytes = data.marshal()?;
        self.ensure_parent_dir()?;
        fs::write(&self.file_path, bytes).map_err(|e| {
            SdkError::from(std::io::Error::new(
                e.kind(),
                format!("failed to write {}: {e}", self.file_path.display()),
            ))
        })?;
        restrict_permissions(&self.file_path, 0o600);
        Ok(())
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        let Some(dir) = self.file_path.parent() else {
            return Ok(());
        };
        if dir.as_os_str().is_empty() || dir.exists() {
            return Ok(());
        }
        fs::create_dir_all(dir)?;
        restrict_permissions(dir, 0o700);
        Ok(())
    }
}

impl Persistor for DiskPersistor {
    fn exists(&self) -> bool {
        self.file_path.exists()
    }

    fn load(&self, data: &mut dyn DataInterface) -> Result<()> {
        match self.read(data) {
            Ok(()) => {
                tracing::debug!(path = %self.file_path.display(), "Configuration loaded");
                Ok(())
            }
            Err(err @ (SdkError::PermissionDenied(_) | SdkError::Decode(_))) => Err(err),
            Err(err) => {
                tracing::debug!(
                    path = %self.file_path.display(),
                    reason = %err,
                    "Configuration file unreadable, writing defaults"
                );
                self.write(data)
            }
        }
    }

    fn save(&self, data: &dyn DataInterface) -> Result<()> {
        self.write(data)?;
        tracing::debug!(path = %self.file_path.display(), "Configuration saved");
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        tracing::warn!(path = %path.display(), error = %e, "Failed to restrict permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) {}

/// In-memory persistor with call counters
///
/// Starts empty; loading an empty persistor leaves the destination untouched.
#[derive(Debug, Default)]
pub struct MemoryPersistor {
    bytes: Mutex<Option<Vec<u8>>>,
    fail_saves: bool,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryPersistor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `bytes` already stored
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.into())),
            ..Self::default()
        }
    }

    /// Every save fails with an I/O error
    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// The last stored bytes
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.lock().clone()
    }

    /// The last stored bytes decoded as JSON
    pub fn json(&self) -> Option<serde_json::Value> {
        self.bytes().and_then(|b| serde_json::from_slice(&b).ok())
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Vec<u8>>> {
        self.bytes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Persistor for MemoryPersistor {
    fn exists(&self) -> bool {
        self.lock().is_some()
    }

    fn load(&self, data: &mut dyn DataInterface) -> Result<()> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match self.lock().as_deref() {
            Some(bytes) => data.unmarshal(bytes),
            None => Ok(()),
        }
    }

    fn save(&self, data: &dyn DataInterface) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(SdkError::Io("simulated save failure".to_string()));
        }
        let bytes = data.marshal()?;
        *self.lock() = Some(bytes);
        Ok(())
    }
}
