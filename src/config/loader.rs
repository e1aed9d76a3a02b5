//! Settings loader: JSON file layered under environment variables
//!
//! A settings object is bound from one named top-level section of a JSON file.
//! The file is optional. Environment variables named
//! `<Section>__<Key>[__<Nested>...]` override file values; keys are matched
//! case-insensitively and bound as strings.

use crate::domain::errors::RepoError;
use crate::domain::result::Result;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings file
pub const APP_SETTINGS_FILE: &str = "appsettings.json";

/// Settings file used by Azure Functions hosts
pub const AZURE_SETTINGS_FILE: &str = "local.settings.json";

/// Separator between nesting levels in environment variable names
pub const ENV_SEPARATOR: &str = "__";

/// Loads named settings sections relative to a base directory
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    base_dir: PathBuf,
}

impl SettingsLoader {
    /// Creates a loader resolving relative file names against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Creates a loader rooted at the current working directory
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Binds `section` of `file_name` (overridden by the process environment)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `section` is empty
    /// - The file exists but cannot be read or is not a JSON object
    /// - The merged section does not deserialize into `T`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cosmos_repo::config::{CosmosSettings, SettingsLoader};
    ///
    /// let settings: CosmosSettings = SettingsLoader::new(".")
    ///     .load_section("appsettings.json", "CosmosSettings")
    ///     .expect("Failed to load settings");
    /// ```
    pub fn load_section<T: DeserializeOwned>(
        &self,
        file_name: impl AsRef<Path>,
        section: &str,
    ) -> Result<T> {
        self.load_section_with_env(file_name, section, std::env::vars())
    }

    /// Same as [`load_section`](Self::load_section) with an explicit set of
    /// environment variables
    pub fn load_section_with_env<T, I>(
        &self,
        file_name: impl AsRef<Path>,
        section: &str,
        vars: I,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = (String, String)>,
    {
        if section.trim().is_empty() {
            return Err(RepoError::empty_argument("section"));
        }

        let path = self.base_dir.join(file_name.as_ref());
        let mut root = read_json_file(&path)?;

        let mut section_value = take_section(&mut root, section)
            .unwrap_or_else(|| Value::Object(Map::new()));

        let Value::Object(ref mut fields) = section_value else {
            return Err(RepoError::Configuration(format!(
                "Section '{section}' in {} is not a JSON object",
                path.display()
            )));
        };

        let overrides = apply_env_overrides(fields, section, vars);
        tracing::debug!(
            file = %path.display(),
            section = section,
            overrides = overrides,
            "Settings section bound"
        );

        serde_json::from_value(section_value).map_err(|e| {
            RepoError::Configuration(format!(
                "Failed to bind section '{section}' from {}: {e}",
                path.display()
            ))
        })
    }
}

/// Binds `section` from `appsettings.json` in the current directory
pub fn load_app_settings<T: DeserializeOwned>(section: &str) -> Result<T> {
    SettingsLoader::from_current_dir()?.load_section(APP_SETTINGS_FILE, section)
}

/// Binds `section` from `local.settings.json` in the current directory
pub fn load_azure_settings<T: DeserializeOwned>(section: &str) -> Result<T> {
    SettingsLoader::from_current_dir()?.load_section(AZURE_SETTINGS_FILE, section)
}

/// Binds `section` from an explicitly named settings file
///
/// Relative paths are resolved against the current directory.
pub fn load_settings_from_file<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    section: &str,
) -> Result<T> {
    SettingsLoader::from_current_dir()?.load_section(path, section)
}

/// Reads a JSON settings file, treating a missing file as empty
fn read_json_file(path: &Path) -> Result<Value> {
    if !path.exists() {
        tracing::debug!(file = %path.display(), "Settings file not found, using environment only");
        return Ok(Value::Object(Map::new()));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RepoError::Configuration(format!(
            "Failed to read settings file {}: {}",
            path.display(),
            e
        ))
    })?;

    let value: Value = serde_json::from_str(&contents).map_err(|e| {
        RepoError::Configuration(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    if !value.is_object() {
        return Err(RepoError::Configuration(format!(
            "Settings file {} must contain a JSON object",
            path.display()
        )));
    }

    Ok(value)
}

/// Removes and returns a top-level section, matching the key case-insensitively
fn take_section(root: &mut Value, section: &str) -> Option<Value> {
    let fields = root.as_object_mut()?;
    let key = find_key(fields, section)?;
    fields.remove(&key)
}

/// Applies `<Section>__<Key>...` variables onto the section and returns how many matched
fn apply_env_overrides<I>(fields: &mut Map<String, Value>, section: &str, vars: I) -> usize
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut applied = 0;

    for (name, value) in vars {
        let segments: Vec<&str> = name.split(ENV_SEPARATOR).collect();
        if segments.len() < 2 || !segments[0].eq_ignore_ascii_case(section) {
            continue;
        }
        if segments[1..].iter().any(|s| s.is_empty()) {
            continue;
        }

        set_path(fields, &segments[1..], value);
        applied += 1;
    }

    applied
}

fn set_path(fields: &mut Map<String, Value>, segments: &[&str], value: String) {
    let Some((head, rest)) = segments.split_first() else {
        return;
    };

    let key = find_key(fields, head).unwrap_or_else(|| head.to_string());

    if rest.is_empty() {
        fields.insert(key, Value::String(value));
        return;
    }

    let entry = fields
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Value::Object(nested) = entry {
        set_path(nested, rest, value);
    }
}

fn find_key(fields: &Map<String, Value>, wanted: &str) -> Option<String> {
    fields
        .keys()
        .find(|k| k.eq_ignore_ascii_case(wanted))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CosmosSettings;
    use secrecy::ExposeSecret;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_settings(dir: &TempDir, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_load_section_from_file() {
        let dir = TempDir::new().unwrap();
        write_settings(
            &dir,
            "appsettings.json",
            r#"{
                "CosmosSettings": {
                    "ConnectionString": "AccountEndpoint=https://a/;AccountKey=k;",
                    "DatabaseName": "db",
                    "ContainerName": "items"
                },
                "Other": {"ignored": true}
            }"#,
        );

        let settings: CosmosSettings = SettingsLoader::new(dir.path())
            .load_section_with_env("appsettings.json", "CosmosSettings", no_env())
            .unwrap();

        assert_eq!(settings.database_name, "db");
        assert_eq!(settings.container_name, "items");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_file_binds_defaults() {
        let dir = TempDir::new().unwrap();
        let settings: CosmosSettings = SettingsLoader::new(dir.path())
            .load_section_with_env("missing.json", "CosmosSettings", no_env())
            .unwrap();

        assert!(settings.database_name.is_empty());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = TempDir::new().unwrap();
        write_settings(
            &dir,
            "appsettings.json",
            r#"{"CosmosSettings": {"DatabaseName": "from-file", "ContainerName": "items"}}"#,
        );

        let env = vec![
            ("CosmosSettings__DatabaseName".to_string(), "from-env".to_string()),
            (
                "COSMOSSETTINGS__CONNECTIONSTRING".to_string(),
                "AccountEndpoint=https://a/;AccountKey=k;".to_string(),
            ),
            ("Unrelated__DatabaseName".to_string(), "nope".to_string()),
        ];

        let settings: CosmosSettings = SettingsLoader::new(dir.path())
            .load_section_with_env("appsettings.json", "CosmosSettings", env)
            .unwrap();

        assert_eq!(settings.database_name, "from-env");
        assert_eq!(settings.container_name, "items");
        assert_eq!(
            settings.connection_string.expose_secret(),
            "AccountEndpoint=https://a/;AccountKey=k;"
        );
    }

    #[test]
    fn test_section_key_matches_case_insensitively() {
        let dir = TempDir::new().unwrap();
        write_settings(
            &dir,
            "custom.json",
            r#"{"cosmossettings": {"databasename": "db"}}"#,
        );

        let value: Value = SettingsLoader::new(dir.path())
            .load_section_with_env("custom.json", "CosmosSettings", no_env())
            .unwrap();
        assert_eq!(value, json!({"databasename": "db"}));
    }

    #[test]
    fn test_nested_environment_override() {
        let mut fields = Map::new();
        fields.insert("Retry".to_string(), json!({"Count": "1"}));

        let applied = apply_env_overrides(
            &mut fields,
            "Section",
            vec![
                ("Section__retry__count".to_string(), "5".to_string()),
                ("Section__Inner__Leaf".to_string(), "x".to_string()),
                ("Section__".to_string(), "skipped".to_string()),
            ],
        );

        assert_eq!(applied, 2);
        assert_eq!(
            Value::Object(fields),
            json!({"Retry": {"Count": "5"}, "Inner": {"Leaf": "x"}})
        );
    }

    #[test]
    fn test_empty_section_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result: Result<CosmosSettings> =
            SettingsLoader::new(dir.path()).load_section_with_env("a.json", "  ", no_env());
        assert!(matches!(
            result,
            Err(RepoError::Argument { argument, .. }) if argument == "section"
        ));
    }

    #[test]
    fn test_malformed_json_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        write_settings(&dir, "bad.json", "{ not json");
        let result: Result<CosmosSettings> =
            SettingsLoader::new(dir.path()).load_section_with_env("bad.json", "CosmosSettings", no_env());
        assert!(matches!(result, Err(RepoError::Configuration(_))));
    }

    #[test]
    fn test_non_object_section_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        write_settings(&dir, "a.json", r#"{"CosmosSettings": "text"}"#);
        let result: Result<CosmosSettings> =
            SettingsLoader::new(dir.path()).load_section_with_env("a.json", "CosmosSettings", no_env());
        assert!(matches!(result, Err(RepoError::Configuration(_))));
    }
}
