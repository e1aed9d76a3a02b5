//! Provision command implementation
//!
//! Creates the configured database and container when they are missing.

use crate::cli::commands::{connect_or_report, exit_code_for, load_or_report};
use clap::Args;

/// Arguments for the provision command
#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Container to create in the configured database (defaults to the
    /// configured container)
    #[arg(long)]
    pub container: Option<String>,

    /// Partition key path for a new container (defaults to the configured path)
    #[arg(long)]
    pub partition_key_path: Option<String>,
}

impl ProvisionArgs {
    /// Execute the provision command
    pub async fn execute(&self, settings_path: &str, section: &str) -> anyhow::Result<i32> {
        let settings = match load_or_report(settings_path, section) {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };
        let mut repo = match connect_or_report(&settings) {
            Ok(r) => r,
            Err(code) => return Ok(code),
        };

        let database = settings.database_name.as_str();
        let container = self.container.as_deref().unwrap_or(&settings.container_name);
        let path = self
            .partition_key_path
            .clone()
            .unwrap_or_else(|| settings.partition_key_path.to_string());

        tracing::info!(database = %database, container = %container, "Provisioning");

        if let Err(e) = repo.create_database(database).await {
            println!("❌ Failed to create database {database}");
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }
        println!("✅ Database ready: {database}");

        if let Err(e) = repo.create_container(container, &path).await {
            println!("❌ Failed to create container {container}");
            println!("   Error: {e}");
            return Ok(exit_code_for(&e));
        }
        println!("✅ Container ready: {container} (partition key {path})");

        repo.close();
        Ok(0)
    }
}
