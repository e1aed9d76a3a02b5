//! CLI interface and argument parsing
//!
//! This module provides the operator command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Operator tool for a Cosmos DB container
#[derive(Parser, Debug)]
#[command(name = "cosmos-repo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON settings file
    #[arg(short, long, default_value = "appsettings.json", env = "COSMOS_REPO_SETTINGS")]
    pub settings: String,

    /// Settings section holding the connection values
    #[arg(long, default_value = "CosmosSettings", env = "COSMOS_REPO_SECTION")]
    pub section: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COSMOS_REPO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the settings file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Create the database and container if they do not exist
    Provision(commands::provision::ProvisionArgs),

    /// Read one document
    Get(commands::documents::GetArgs),

    /// Query documents
    Query(commands::documents::QueryArgs),

    /// Count documents
    Count(commands::documents::CountArgs),

    /// Delete one document
    Delete(commands::documents::DeleteArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["cosmos-repo", "validate-config"]);
        assert_eq!(cli.settings, "appsettings.json");
        assert_eq!(cli.section, "CosmosSettings");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_settings_and_section() {
        let cli = Cli::parse_from([
            "cosmos-repo",
            "--settings",
            "local.settings.json",
            "--section",
            "Orders",
            "count",
        ]);
        assert_eq!(cli.settings, "local.settings.json");
        assert_eq!(cli.section, "Orders");
        assert!(matches!(cli.command, Commands::Count(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["cosmos-repo", "--log-level", "debug", "provision"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::Provision(_)));
    }

    #[test]
    fn test_cli_parse_get() {
        let cli = Cli::parse_from([
            "cosmos-repo",
            "get",
            "7d44b88c-4199-4bad-97dc-d78268e01398",
            "--partition-key",
            "contoso",
        ]);
        match cli.command {
            Commands::Get(args) => {
                assert_eq!(args.id, "7d44b88c-4199-4bad-97dc-d78268e01398");
                assert_eq!(args.partition_key.as_deref(), Some("contoso"));
            }
            other => panic!("Expected get, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_query_with_params() {
        let cli = Cli::parse_from([
            "cosmos-repo",
            "query",
            "--text",
            "SELECT * FROM c WHERE c.total > @min",
            "--param",
            "min=10",
        ]);
        match cli.command {
            Commands::Query(args) => assert_eq!(args.params, vec!["min=10".to_string()]),
            other => panic!("Expected query, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_delete() {
        let cli = Cli::parse_from(["cosmos-repo", "delete", "id-1", "pk-1"]);
        assert!(matches!(cli.command, Commands::Delete(_)));
    }
}
