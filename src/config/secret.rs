//! In-memory handling of session tokens using the secrecy crate
//!
//! Tokens are written to the configuration file as plain strings; the file's
//! permissions are the only protection on disk. In memory they live in a
//! [`SecretString`], which zeroes its buffer on drop, redacts `Debug` output
//! and requires `expose_secret()` to read.
//!
//! # Example
//!
//! ```rust
//! use bxconfig::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("eyJhbGciOi...");
//! assert_eq!(token.expose_secret().expose(), "eyJhbGciOi...");
//! assert!(!format!("{token:?}").contains("eyJhbGciOi"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    /// Access the underlying string
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl From<&str> for SecretValue {
    fn from(s: &str) -> Self {
        SecretValue(s.to_string())
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

/// Older writers store `null` for a logged-out token
impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(|s| SecretValue(s.unwrap_or_default()))
    }
}

/// A token held in memory
pub type SecretString = Secret<SecretValue>;

/// Wraps `value` in a [`SecretString`]
#[inline]
pub fn secret_string(value: impl Into<SecretValue>) -> SecretString {
    Secret::new(value.into())
}
