//! CLI command implementations
//!
//! This module contains all CLI command implementations and the helpers
//! they share for loading settings and opening a repository.

pub mod documents;
pub mod provision;
pub mod validate;

use crate::config::{load_settings_from_file, CosmosSettings};
use crate::domain::{Document, RepoError};
use crate::repository::Repository;
use serde_json::Value;

/// Exit code for settings that cannot be loaded or are invalid
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Exit code when the requested document does not exist
pub const EXIT_NOT_FOUND: i32 = 3;

/// Exit code for failures reported by the service
pub const EXIT_SERVICE_ERROR: i32 = 4;

/// Load the settings section named on the command line
pub fn load_cosmos_settings(settings_path: &str, section: &str) -> crate::domain::Result<CosmosSettings> {
    load_settings_from_file(settings_path, section)
}

/// Load settings, printing the failure and returning the exit code on error
pub fn load_or_report(settings_path: &str, section: &str) -> Result<CosmosSettings, i32> {
    load_cosmos_settings(settings_path, section).map_err(|e| {
        println!("❌ Failed to load settings from {settings_path}");
        println!("   Error: {e}");
        EXIT_CONFIG_ERROR
    })
}

/// Connect a schemaless repository, printing the failure and returning the
/// exit code on error
pub fn connect_or_report(settings: &CosmosSettings) -> Result<Repository<Document>, i32> {
    Repository::connect(settings).map_err(|e| {
        println!("❌ Failed to create repository");
        println!("   Error: {e}");
        EXIT_CONFIG_ERROR
    })
}

/// Load settings and connect in one step
pub fn open_repository(settings_path: &str, section: &str) -> Result<Repository<Document>, i32> {
    let settings = load_or_report(settings_path, section)?;
    connect_or_report(&settings)
}

/// Exit code for an operation error
pub fn exit_code_for(error: &RepoError) -> i32 {
    match error {
        RepoError::Configuration(_) | RepoError::Argument { .. } | RepoError::Format(_) => {
            EXIT_CONFIG_ERROR
        }
        e if e.is_not_found() => EXIT_NOT_FOUND,
        _ => EXIT_SERVICE_ERROR,
    }
}

/// Parse a `name=value` pair
///
/// The value is read as JSON when it parses, otherwise as a string, so
/// `total=10` binds a number and `status=open` binds a string.
pub fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Expected name=value, got '{raw}'"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Missing name in '{raw}'"));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("total=10").unwrap(), ("total".to_string(), json!(10)));
        assert_eq!(
            parse_key_value("status=open").unwrap(),
            ("status".to_string(), json!("open"))
        );
        assert_eq!(
            parse_key_value("note=a=b").unwrap(),
            ("note".to_string(), json!("a=b"))
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=1").is_err());
    }

    #[test]
    fn test_exit_code_for() {
        assert_eq!(exit_code_for(&RepoError::Format("x".into())), EXIT_CONFIG_ERROR);
        assert_eq!(
            exit_code_for(&RepoError::CosmosDb(crate::domain::CosmosDbError::NotFound(
                "x".into()
            ))),
            EXIT_NOT_FOUND
        );
        assert_eq!(exit_code_for(&RepoError::Disposed), EXIT_SERVICE_ERROR);
    }
}
