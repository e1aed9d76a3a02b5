//! Secure credential handling using the secrecy crate
//!
//! This module provides type aliases and utilities for handling sensitive
//! credentials in memory. It uses the `secrecy` crate which automatically
//! zeros memory when secrets are dropped, preventing exposure in memory dumps
//! or crash reports.
//!
//! # Security Features
//!
//! - **Automatic Zeroization**: Memory is zeroed when `Secret<T>` is dropped
//! - **Debug Protection**: Custom Debug implementation prevents logging
//! - **Explicit Access**: Must call `expose_secret()` to access the value
//!
//! The Cosmos DB connection string embeds the account key, so it is always
//! held as a [`SecretString`].
//!
//! # Example
//!
//! ```rust
//! use cosmos_repo::config::{SecretString, SecretValue};
//! use secrecy::{Secret, ExposeSecret};
//!
//! let conn: SecretString = Secret::new(SecretValue::from(
//!     "AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=a2V5;".to_string(),
//! ));
//!
//! // Access the secret (only when needed)
//! assert!(conn.expose_secret().as_str().starts_with("AccountEndpoint="));
//!
//! // Debug output is redacted
//! assert!(!format!("{conn:?}").contains("AccountKey"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl From<SecretValue> for String {
    fn from(mut s: SecretValue) -> Self {
        std::mem::take(&mut s.0)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the secret value is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Returns the secret as a string slice
    pub fn as_str(&self) -> &str {
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

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Type alias for a secret string
///
/// This wraps a `SecretValue` in a `Secret` container that:
/// - Zeros the memory when dropped
/// - Prevents accidental logging via Debug
/// - Requires explicit `expose_secret()` to access
pub type SecretString = Secret<SecretValue>;

/// Helper function to create a SecretString from a String
///
/// # Arguments
///
/// * `value` - The string value to protect
///
/// # Example
///
/// ```rust
/// use cosmos_repo::config::secret_string;
///
/// let conn = secret_string("AccountEndpoint=https://acct.documents.azure.com:443/;".to_string());
/// ```
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// An empty secret, used as the serde default for absent settings
pub fn empty_secret() -> SecretString {
    secret_string(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("AccountKey=abc".to_string());
        assert_eq!(secret.expose_secret(), "AccountKey=abc");
        assert_eq!(secret.expose_secret().as_str(), "AccountKey=abc");
    }

    #[test]
    fn test_empty_secret_is_blank() {
        assert!(empty_secret().expose_secret().is_blank());
        assert!(secret_string("  ".to_string()).expose_secret().is_blank());
        assert!(!secret_string("x".to_string()).expose_secret().is_blank());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");

        // Should not contain the actual secret
        assert!(!debug_output.contains("sensitive-data"));
        // Should contain redaction indicator
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_secret_serde() {
        use serde::{Deserialize, Serialize};

        #[derive(Serialize, Deserialize)]
        struct TestSettings {
            connection_string: SecretString,
        }

        let settings = TestSettings {
            connection_string: secret_string("AccountKey=test123".to_string()),
        };

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("test123"));

        let deserialized: TestSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(
            deserialized.connection_string.expose_secret(),
            "AccountKey=test123"
        );
    }
}
