//! Integration tests for settings loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX`.

use cosmos_repo::config::{
    load_settings_from_file, CosmosSettings, SettingsLoader, COSMOS_SETTINGS_SECTION,
};
use cosmos_repo::domain::{Document, RepoError};
use cosmos_repo::repository::Repository;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::{NamedTempFile, TempDir};

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const CONNECTION: &str = "AccountEndpoint=https://test.documents.azure.com:443/;AccountKey=dGVzdA==;";

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("CosmosSettings__DatabaseName");
    std::env::remove_var("COSMOSSETTINGS__CONTAINERNAME");
    std::env::remove_var("CosmosSettings__ConnectionString");
}

fn settings_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_complete_settings() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = settings_file(&format!(
        r#"{{
            "CosmosSettings": {{
                "ConnectionString": "{CONNECTION}",
                "DatabaseName": "shop",
                "ContainerName": "orders",
                "PartitionKeyPath": "/tenant"
            }}
        }}"#
    ));

    let settings: CosmosSettings =
        load_settings_from_file(file.path(), COSMOS_SETTINGS_SECTION).unwrap();

    assert_eq!(settings.connection_string.expose_secret().as_str(), CONNECTION);
    assert_eq!(settings.database_name, "shop");
    assert_eq!(settings.container_name, "orders");
    assert_eq!(settings.partition_key_path.as_str(), "/tenant");
    assert!(settings.validate().is_ok());
}

#[test]
fn test_environment_overrides_file_values() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = settings_file(
        r#"{"CosmosSettings": {"DatabaseName": "from-file", "ContainerName": "orders"}}"#,
    );

    std::env::set_var("CosmosSettings__DatabaseName", "from-env");
    std::env::set_var("COSMOSSETTINGS__CONTAINERNAME", "upper-env");

    let settings: CosmosSettings =
        load_settings_from_file(file.path(), COSMOS_SETTINGS_SECTION).unwrap();

    cleanup_env_vars();

    assert_eq!(settings.database_name, "from-env");
    assert_eq!(settings.container_name, "upper-env");
}

#[test]
fn test_missing_file_binds_environment_only() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_dir = TempDir::new().unwrap();
    std::env::set_var("CosmosSettings__ConnectionString", CONNECTION);

    let settings: CosmosSettings = SettingsLoader::new(temp_dir.path())
        .load_section("missing.json", COSMOS_SETTINGS_SECTION)
        .unwrap();

    cleanup_env_vars();

    assert_eq!(settings.connection_string.expose_secret().as_str(), CONNECTION);
    assert!(settings.database_name.is_empty());

    // Validation happens when the repository is built
    let err = Repository::<Document>::connect(&settings).err().unwrap();
    assert!(matches!(err, RepoError::Argument { ref argument, .. } if argument == "DatabaseName"));
}

#[test]
fn test_malformed_json_is_configuration_error() {
    let file = settings_file("{ not json");

    let result: Result<CosmosSettings, _> =
        load_settings_from_file(file.path(), COSMOS_SETTINGS_SECTION);
    assert!(matches!(result, Err(RepoError::Configuration(_))));
}

#[test]
fn test_empty_section_is_argument_error() {
    let file = settings_file("{}");

    let result: Result<CosmosSettings, _> = load_settings_from_file(file.path(), " ");
    assert!(matches!(
        result,
        Err(RepoError::Argument { ref argument, .. }) if argument == "section"
    ));
}

#[test]
fn test_empty_connection_string_names_field() {
    let settings = CosmosSettings::new("", "db", "c");
    let err = Repository::<Document>::connect(&settings).err().unwrap();

    assert!(matches!(err, RepoError::Argument { ref argument, .. } if argument == "ConnectionString"));
    assert!(err.to_string().contains("ConnectionString"));
}
