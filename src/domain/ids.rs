//! Identifier handling
//!
//! Document identifiers are strings that are expected to round-trip as GUIDs.
//! An empty identifier or the all-zero GUID means "unassigned".
//! [`PartitionKeyPath`] is a newtype for the container's partition key path.

use super::errors::RepoError;
use super::result::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generates a fresh document identifier (hyphenated, lowercase v4 GUID)
pub fn new_document_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parses an identifier as a GUID
///
/// # Errors
///
/// Returns [`RepoError::Format`] if `id` is not a valid GUID.
pub fn parse_document_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id)
        .map_err(|e| RepoError::Format(format!("'{id}' is not a valid GUID: {e}")))
}

/// Whether an identifier still needs to be generated
///
/// Empty identifiers and the all-zero GUID are unassigned. Whitespace is
/// not trimmed, so `" "` is a malformed identifier rather than an empty one.
///
/// # Errors
///
/// Returns [`RepoError::Format`] for a non-empty identifier that is not a GUID.
///
/// # Examples
///
/// ```
/// use cosmos_repo::domain::ids::is_unassigned;
///
/// assert!(is_unassigned("").unwrap());
/// assert!(is_unassigned("00000000-0000-0000-0000-000000000000").unwrap());
/// assert!(!is_unassigned("7d44b88c-4199-4bad-97dc-d78268e01398").unwrap());
/// assert!(is_unassigned("not-a-guid").is_err());
/// assert!(is_unassigned(" ").is_err());
/// ```
pub fn is_unassigned(id: &str) -> Result<bool> {
    if id.is_empty() {
        return Ok(true);
    }
    Ok(parse_document_id(id)?.is_nil())
}

/// Requires an identifier to be assigned
///
/// # Errors
///
/// - [`RepoError::Argument`] if the identifier is empty or the all-zero GUID
/// - [`RepoError::Format`] if it is not a GUID, including a GUID with
///   surrounding whitespace
pub fn require_assigned(argument: &str, id: &str) -> Result<Uuid> {
    if id.is_empty() {
        return Err(RepoError::empty_argument(argument));
    }

    let parsed = parse_document_id(id)?;
    if parsed.is_nil() {
        return Err(RepoError::argument(
            argument,
            "The element id must not be an empty GUID",
        ));
    }
    Ok(parsed)
}

/// Partition key path newtype wrapper
///
/// A path such as `/id` or `/customer/region` locating the partition key
/// value inside a document.
///
/// # Examples
///
/// ```
/// use cosmos_repo::domain::ids::PartitionKeyPath;
/// use serde_json::json;
///
/// let path = PartitionKeyPath::new("/tenant/region").unwrap();
/// let doc = json!({"id": "1", "tenant": {"region": "eu"}});
/// assert_eq!(path.value_in(&doc), Some("eu"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartitionKeyPath(String);

impl PartitionKeyPath {
    /// Creates a new PartitionKeyPath
    ///
    /// Returns `Err` if the path is empty or does not start with `/`.
    pub fn new(path: impl Into<String>) -> std::result::Result<Self, String> {
        let path = path.into();
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err("Partition key path cannot be empty".to_string());
        }
        if !trimmed.starts_with('/') || trimmed.len() == 1 {
            return Err(format!(
                "Partition key path must start with '/' and name a property, got: {path}"
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extracts the string value at this path from a document
    pub fn value_in<'a>(&self, document: &'a Value) -> Option<&'a str> {
        document.pointer(&self.0).and_then(Value::as_str)
    }
}

impl Default for PartitionKeyPath {
    fn default() -> Self {
        Self("/id".to_string())
    }
}

impl fmt::Display for PartitionKeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PartitionKeyPath {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PartitionKeyPath {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PartitionKeyPath> for String {
    fn from(path: PartitionKeyPath) -> Self {
        path.0
    }
}

impl AsRef<str> for PartitionKeyPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
