//! Configuration schema types
//!
//! Settings are plain serde structs. JSON keys use PascalCase
//! (`ConnectionString`, `DatabaseName`, ...) so existing `appsettings.json`
//! files bind unchanged.

use crate::config::secret::{empty_secret, secret_string, SecretString};
use crate::domain::ids::PartitionKeyPath;
use crate::domain::{RepoError, Result};
use serde::{Deserialize, Serialize};

/// Section key conventionally used for [`CosmosSettings`]
pub const COSMOS_SETTINGS_SECTION: &str = "CosmosSettings";

/// Section key conventionally used for [`LoggingConfig`]
pub const LOGGING_SECTION: &str = "Logging";

/// Connection settings for a single container
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CosmosSettings {
    /// Connection string (`AccountEndpoint=...;AccountKey=...;`)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default = "empty_secret")]
    pub connection_string: SecretString,

    /// Database to bind
    #[serde(default)]
    pub database_name: String,

    /// Container to bind
    #[serde(default)]
    pub container_name: String,

    /// Partition key path of the container
    #[serde(default)]
    pub partition_key_path: PartitionKeyPath,
}

impl CosmosSettings {
    /// Creates settings from raw values with the default partition key path
    pub fn new(
        connection_string: impl Into<String>,
        database_name: impl Into<String>,
        container_name: impl Into<String>,
    ) -> Self {
        Self {
            connection_string: secret_string(connection_string.into()),
            database_name: database_name.into(),
            container_name: container_name.into(),
            partition_key_path: PartitionKeyPath::default(),
        }
    }

    /// Sets the partition key path
    pub fn with_partition_key_path(mut self, path: PartitionKeyPath) -> Self {
        self.partition_key_path = path;
        self
    }

    /// Validates that every required field is present
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Argument`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        use secrecy::ExposeSecret;

        if self.connection_string.expose_secret().is_blank() {
            return Err(RepoError::empty_argument("ConnectionString"));
        }

        if self.database_name.trim().is_empty() {
            return Err(RepoError::empty_argument("DatabaseName"));
        }

        if self.container_name.trim().is_empty() {
            return Err(RepoError::empty_argument("ContainerName"));
        }

        Ok(())
    }
}

impl Default for CosmosSettings {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default, deserialize_with = "bool_or_string")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    /// Validates the logging configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

/// Environment overrides arrive as strings, so accept `"true"` as well as `true`
fn bool_or_string<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Text(t) => t.trim().parse::<bool>().map_err(|_| {
            serde::de::Error::custom(format!("expected true or false, got '{t}'"))
        }),
    }
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn settings() -> CosmosSettings {
        CosmosSettings::new(
            "AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=a2V5;",
            "db",
            "items",
        )
    }

    #[test]
    fn test_valid_settings() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn test_empty_connection_string_is_named() {
        let mut config = settings();
        config.connection_string = secret_string(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ConnectionString"));
    }

    #[test]
    fn test_empty_database_and_container_are_named() {
        let mut config = settings();
        config.database_name = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(RepoError::Argument { argument, .. }) if argument == "DatabaseName"
        ));

        let mut config = settings();
        config.container_name = String::new();
        assert!(matches!(
            config.validate(),
            Err(RepoError::Argument { argument, .. }) if argument == "ContainerName"
        ));
    }

    #[test]
    fn test_settings_bind_from_pascal_case_json() {
        let config: CosmosSettings = serde_json::from_value(json!({
            "ConnectionString": "AccountEndpoint=https://a/;AccountKey=k;",
            "DatabaseName": "db",
            "ContainerName": "items",
            "PartitionKeyPath": "/tenant"
        }))
        .unwrap();

        assert_eq!(
            config.connection_string.expose_secret(),
            "AccountEndpoint=https://a/;AccountKey=k;"
        );
        assert_eq!(config.database_name, "db");
        assert_eq!(config.container_name, "items");
        assert_eq!(config.partition_key_path.as_str(), "/tenant");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let config: CosmosSettings = serde_json::from_value(json!({})).unwrap();
        assert!(config.connection_string.expose_secret().is_blank());
        assert!(config.database_name.is_empty());
        assert_eq!(config.partition_key_path.as_str(), "/id");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_settings_debug_redacts_connection_string() {
        let debug = format!("{:?}", settings());
        assert!(!debug.contains("a2V5"));
        assert!(debug.contains("items"));
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert_eq!(config.local_path, "logs");
        assert_eq!(config.local_rotation, "daily");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig {
            local_rotation: "weekly".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_enabled_accepts_string_override() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"LocalEnabled": "true", "LocalPath": "out"}"#).unwrap();
        assert!(config.local_enabled);

        let config: LoggingConfig = serde_json::from_str(r#"{"LocalEnabled": false}"#).unwrap();
        assert!(!config.local_enabled);

        assert!(serde_json::from_str::<LoggingConfig>(r#"{"LocalEnabled": "yes"}"#).is_err());
    }
}
