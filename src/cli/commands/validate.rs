//! Validate config command implementation
//!
//! This module implements the `validate-config` command, which loads the
//! settings section and checks it without contacting the service.

use crate::adapters::cosmosdb::ConnectionString;
use crate::cli::commands::{load_cosmos_settings, EXIT_CONFIG_ERROR};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, settings_path: &str, section: &str) -> anyhow::Result<i32> {
        tracing::info!(settings_path = %settings_path, section = %section, "Validating settings");

        println!("🔍 Validating settings: {settings_path} [{section}]");
        println!();

        let settings = match load_cosmos_settings(settings_path, section) {
            Ok(s) => {
                println!("✅ Settings loaded successfully");
                s
            }
            Err(e) => {
                println!("❌ Failed to load settings");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if let Err(e) = settings.validate() {
            println!("❌ Settings validation failed");
            println!("   Error: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let connection =
            match ConnectionString::parse(settings.connection_string.expose_secret().as_str()) {
                Ok(c) => c,
                Err(e) => {
                    println!("❌ Connection string is invalid");
                    println!("   Error: {e}");
                    return Ok(EXIT_CONFIG_ERROR);
                }
            };

        println!("✅ Settings are valid");
        println!();
        println!("Settings Summary:");
        println!("  Endpoint: {}", connection.account_endpoint());
        println!("  Database: {}", settings.database_name);
        println!("  Container: {}", settings.container_name);
        println!("  Partition Key Path: {}", settings.partition_key_path);
        println!();
        Ok(0)
    }
}
