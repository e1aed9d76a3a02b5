//! Document commands
//!
//! `get`, `query`, `count` and `delete` over the configured container,
//! using the schemaless [`Document`] entity. Results are printed as JSON.

use crate::cli::commands::{exit_code_for, open_repository, parse_key_value, EXIT_CONFIG_ERROR};
use crate::domain::query::{Filter, SqlQuery};
use crate::domain::{Document, RepoError};
use clap::Args;

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Document id
    pub id: String,

    /// Partition key value; without it the id is searched in every partition
    #[arg(long)]
    pub partition_key: Option<String>,
}

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Query text; defaults to every document
    #[arg(long, conflicts_with = "where_eq")]
    pub text: Option<String>,

    /// Query parameter as name=value (repeatable)
    #[arg(long = "param")]
    pub params: Vec<String>,

    /// Server-side equality filter as field=value (repeatable)
    #[arg(long = "where")]
    pub where_eq: Vec<String>,

    /// Resume from a continuation token
    #[arg(long)]
    pub continuation: Option<String>,

    /// Print only one page and its continuation token
    #[arg(long)]
    pub page: bool,
}

/// Arguments for the count command
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Count every page instead of only the first
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the delete command
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Document id (a GUID)
    pub id: String,

    /// Partition key value
    pub partition_key: String,
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(error: &RepoError) -> i32 {
    crate::log_error_with_context!(error, "Command failed");
    println!("❌ {error}");
    exit_code_for(error)
}

impl GetArgs {
    /// Execute the get command
    pub async fn execute(&self, settings_path: &str, section: &str) -> anyhow::Result<i32> {
        let repo = match open_repository(settings_path, section) {
            Ok(r) => r,
            Err(code) => return Ok(code),
        };

        let result = match &self.partition_key {
            Some(pk) => repo.get(&self.id, pk).await.map(Some),
            None => repo.find_by_id(&self.id).await,
        };

        match result {
            Ok(Some(document)) => {
                print_json(&document)?;
                Ok(0)
            }
            Ok(None) => {
                println!("❌ Document {} not found", self.id);
                Ok(super::EXIT_NOT_FOUND)
            }
            Err(e) => Ok(report(&e)),
        }
    }
}

impl QueryArgs {
    fn build_query(&self) -> Result<SqlQuery, String> {
        if !self.where_eq.is_empty() {
            let mut filter = Filter::new();
            for raw in &self.where_eq {
                let (field, value) = parse_key_value(raw)?;
                filter = filter.eq(&field, value);
            }
            return Ok(filter.into_query());
        }

        let parameters = self
            .params
            .iter()
            .map(|raw| parse_key_value(raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .text
            .as_deref()
            .map(SqlQuery::new)
            .unwrap_or_else(SqlQuery::select_all)
            .with_parameters(parameters))
    }

    /// Execute the query command
    pub async fn execute(&self, settings_path: &str, section: &str) -> anyhow::Result<i32> {
        let query = match self.build_query() {
            Ok(q) => q,
            Err(message) => {
                println!("❌ {message}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let repo = match open_repository(settings_path, section) {
            Ok(r) => r,
            Err(code) => return Ok(code),
        };

        if self.page {
            return match repo.query_page(query, self.continuation.as_deref()).await {
                Ok(page) => {
                    print_json(&page.items)?;
                    if let Some(token) = &page.continuation_token {
                        println!("Continuation: {token}");
                    }
                    Ok(0)
                }
                Err(e) => Ok(report(&e)),
            };
        }

        let result: Result<Vec<Document>, RepoError> = match &self.continuation {
            Some(token) => repo.query_from(query, token).await,
            None => repo.query(query).await,
        };

        match result {
            Ok(documents) => {
                print_json(&documents)?;
                Ok(0)
            }
            Err(e) => Ok(report(&e)),
        }
    }
}

impl CountArgs {
    /// Execute the count command
    pub async fn execute(&self, settings_path: &str, section: &str) -> anyhow::Result<i32> {
        let repo = match open_repository(settings_path, section) {
            Ok(r) => r,
            Err(code) => return Ok(code),
        };

        let result = if self.all {
            repo.count_all().await
        } else {
            repo.count().await
        };

        match result {
            Ok(count) => {
                println!("{count}");
                Ok(0)
            }
            Err(e) => Ok(report(&e)),
        }
    }
}

impl DeleteArgs {
    /// Execute the delete command
    pub async fn execute(&self, settings_path: &str, section: &str) -> anyhow::Result<i32> {
        let repo = match open_repository(settings_path, section) {
            Ok(r) => r,
            Err(code) => return Ok(code),
        };

        match repo.delete(&self.id, &self.partition_key).await {
            Ok(()) => {
                println!("✅ Deleted {}", self.id);
                Ok(0)
            }
            Err(e) => Ok(report(&e)),
        }
    }
}
