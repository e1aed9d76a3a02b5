//! Configuration management.
//!
//! Settings are bound from a named top-level section of a JSON file,
//! overridden by environment variables using the `<Section>__<Key>` convention.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cosmos_repo::config::{load_app_settings, CosmosSettings, COSMOS_SETTINGS_SECTION};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings: CosmosSettings = load_app_settings(COSMOS_SETTINGS_SECTION)?;
//! println!("Database: {}", settings.database_name);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Settings File
//!
//! ```json
//! {
//!   "CosmosSettings": {
//!     "ConnectionString": "AccountEndpoint=https://acct.documents.azure.com:443/;AccountKey=...;",
//!     "DatabaseName": "shop",
//!     "ContainerName": "orders",
//!     "PartitionKeyPath": "/id"
//!   }
//! }
//! ```
//!
//! # Environment Variables
//!
//! ```bash
//! export CosmosSettings__ConnectionString="AccountEndpoint=...;AccountKey=...;"
//! export CosmosSettings__DatabaseName="shop"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{
    load_app_settings, load_azure_settings, load_settings_from_file, SettingsLoader,
    APP_SETTINGS_FILE, AZURE_SETTINGS_FILE,
};
pub use schema::{CosmosSettings, LoggingConfig, COSMOS_SETTINGS_SECTION, LOGGING_SECTION};
pub use secret::{secret_string, SecretString, SecretValue};
