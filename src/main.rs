// Cosmos Repo - Typed repository for Azure Cosmos DB
// Copyright (c) 2025 Cosmos Repo Contributors
// Licensed under the MIT License

use clap::Parser;
use cosmos_repo::cli::{Cli, Commands};
use cosmos_repo::config::{load_settings_from_file, LoggingConfig, LOGGING_SECTION};
use cosmos_repo::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The Logging section is optional; a bad one falls back to console only
    let logging_config: LoggingConfig =
        load_settings_from_file(&cli.settings, LOGGING_SECTION).unwrap_or_else(|e| {
            eprintln!("Ignoring logging settings: {e}");
            LoggingConfig::default()
        });

    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cosmos-repo");

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let (settings, section) = (cli.settings.as_str(), cli.section.as_str());
    match &cli.command {
        Commands::ValidateConfig(args) => args.execute(settings, section).await,
        Commands::Provision(args) => args.execute(settings, section).await,
        Commands::Get(args) => args.execute(settings, section).await,
        Commands::Query(args) => args.execute(settings, section).await,
        Commands::Count(args) => args.execute(settings, section).await,
        Commands::Delete(args) => args.execute(settings, section).await,
    }
}
