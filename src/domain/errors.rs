//! Domain error types
//!
//! This module defines the error hierarchy for the repository. Validation
//! failures are rejected before any store access, non-success status codes
//! become [`CosmosClientError`], and failures reported by the SDK itself are
//! carried as [`CosmosDbError`] without being reinterpreted.
//! No third-party SDK types are exposed.

use thiserror::Error;

/// Main repository error type
///
/// This is the primary error type used throughout the crate.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A required argument was missing or empty
    #[error("Invalid argument `{argument}`: {message}")]
    Argument { argument: String, message: String },

    /// An identifier could not be parsed as a GUID
    #[error("Format error: {0}")]
    Format(String),

    /// Non-success status returned for an operation
    #[error(transparent)]
    Client(#[from] CosmosClientError),

    /// Errors reported by the document store itself
    #[error("Cosmos DB error: {0}")]
    CosmosDb(#[from] CosmosDbError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// The repository has already been closed
    #[error("Repository has been closed")]
    Disposed,
}

impl RepoError {
    /// Builds an argument error for the named argument
    pub fn argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        RepoError::Argument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Builds the standard "is null or empty" argument error
    pub fn empty_argument(argument: impl Into<String>) -> Self {
        let argument = argument.into();
        let message = format!("{argument} is null or empty");
        RepoError::Argument { argument, message }
    }

    /// Returns the HTTP-style status code carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            RepoError::Client(e) => e.status(),
            RepoError::CosmosDb(e) => e.status(),
            _ => None,
        }
    }

    /// Whether the error is a "not found" reported by the store
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::CosmosDb(CosmosDbError::NotFound(_)))
    }
}

/// Library-specific error raised when an operation completes with a status
/// outside 200-299
///
/// Carries a message, the offending status when known, and an optional
/// inner cause.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CosmosClientError {
    message: String,
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl CosmosClientError {
    /// Creates a new error with only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    /// Creates an error describing a non-success response
    ///
    /// `operation` reads as a verb phrase, e.g. `"insert element"`.
    pub fn from_status(operation: &str, status: u16) -> Self {
        Self {
            message: format!("Cannot {operation} response code {status}"),
            status: Some(status),
            source: None,
        }
    }

    /// Attaches an inner cause
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The status code that triggered the error, if any
    pub fn status(&self) -> Option<u16> {
        self.status
    }
}

/// Cosmos DB-specific errors
///
/// Failures reported by the store. These are propagated as-is and
/// never retried at this layer.
#[derive(Debug, Error)]
pub enum CosmosDbError {
    /// Failed to connect to Cosmos DB
    #[error("Failed to connect to Cosmos DB: {0}")]
    ConnectionFailed(String),

    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Conflict error (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Throttling error (429)
    #[error("Request rate too large (429): {0}")]
    Throttled(String),

    /// Any other failed request
    #[error("Request failed{}: {message}", .status.map(|s| format!(" with status {s}")).unwrap_or_default())]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    /// Failed to deserialize a response
    #[error("Failed to deserialize response: {0}")]
    DeserializationFailed(String),
}

impl CosmosDbError {
    /// Maps a status code and message onto the matching variant
    pub fn from_status(status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            Some(404) => CosmosDbError::NotFound(message),
            Some(409) => CosmosDbError::Conflict(message),
            Some(429) => CosmosDbError::Throttled(message),
            status => CosmosDbError::RequestFailed { status, message },
        }
    }

    /// Returns the status code this error corresponds to, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CosmosDbError::NotFound(_) => Some(404),
            CosmosDbError::Conflict(_) => Some(409),
            CosmosDbError::Throttled(_) => Some(429),
            CosmosDbError::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for RepoError {
    fn from(err: std::io::Error) -> Self {
        RepoError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_error_display() {
        let err = RepoError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_empty_argument_names_the_argument() {
        let err = RepoError::empty_argument("ConnectionString");
        assert!(matches!(
            &err,
            RepoError::Argument { argument, .. } if argument == "ConnectionString"
        ));
        assert_eq!(
            err.to_string(),
            "Invalid argument `ConnectionString`: ConnectionString is null or empty"
        );
    }

    #[test]
    fn test_client_error_from_status() {
        let err = CosmosClientError::from_status("upsert element", 503);
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.message(), "Cannot upsert element response code 503");

        let repo_err: RepoError = err.into();
        assert_eq!(repo_err.status(), Some(503));
        assert_eq!(repo_err.to_string(), "Cannot upsert element response code 503");
    }

    #[test]
    fn test_client_error_keeps_source() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
        let err = CosmosClientError::new("write failed").with_source(io_err);
        assert_eq!(err.source().unwrap().to_string(), "socket closed");
    }

    #[test]
    fn test_cosmosdb_error_from_status() {
        assert!(matches!(
            CosmosDbError::from_status(Some(404), "x"),
            CosmosDbError::NotFound(_)
        ));
        assert!(matches!(
            CosmosDbError::from_status(Some(409), "x"),
            CosmosDbError::Conflict(_)
        ));
        assert!(matches!(
            CosmosDbError::from_status(Some(429), "x"),
            CosmosDbError::Throttled(_)
        ));
        let other = CosmosDbError::from_status(Some(500), "boom");
        assert_eq!(other.status(), Some(500));
        assert_eq!(other.to_string(), "Request failed with status 500: boom");
        assert_eq!(
            CosmosDbError::from_status(None, "boom").to_string(),
            "Request failed: boom"
        );
    }

    #[test]
    fn test_not_found_detection() {
        let err: RepoError = CosmosDbError::NotFound("doc".to_string()).into();
        assert!(err.is_not_found());
        assert!(!RepoError::Disposed.is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let repo_err: RepoError = io_err.into();
        assert!(matches!(repo_err, RepoError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let repo_err: RepoError = json_err.into();
        assert!(matches!(repo_err, RepoError::Serialization(_)));
    }

    #[test]
    fn test_repo_error_implements_std_error() {
        let err = RepoError::Format("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
