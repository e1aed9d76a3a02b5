// Cosmos Repo - Typed repository for Azure Cosmos DB
// Copyright (c) 2025 Cosmos Repo Contributors
// Licensed under the MIT License

//! # Cosmos Repo - Typed repository for Azure Cosmos DB
//!
//! A thin, strongly typed wrapper around the Azure Cosmos DB SDK for one
//! container: CRUD, queries, counts and container administration for any
//! serde type that exposes an identifier.
//!
//! ## Architecture
//!
//! - [`domain`] - Errors, the [`domain::Entity`] contract, identifiers and queries
//! - [`config`] - Settings schema and the named-section JSON loader
//! - [`adapters`] - The document store seam, Cosmos DB and in-memory stores
//! - [`repository`] - [`repository::Repository`], the public entry point
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface and argument parsing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cosmos_repo::config::{load_app_settings, CosmosSettings, COSMOS_SETTINGS_SECTION};
//! use cosmos_repo::domain::Document;
//! use cosmos_repo::repository::Repository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Bind the "CosmosSettings" section of appsettings.json (env overrides apply)
//!     let settings: CosmosSettings = load_app_settings(COSMOS_SETTINGS_SECTION)?;
//!     let repo: Repository<Document> = Repository::connect(&settings)?;
//!
//!     // An empty id is replaced with a fresh GUID
//!     let saved = repo.insert(Document::new("").with_property("status", "open")).await?;
//!     let loaded = repo.get(&saved.id, &saved.id).await?;
//!     println!("Loaded {}", loaded.id);
//!     Ok(())
//! }
//! ```
//!
//! ## Queries
//!
//! Filters can run on the server or in process; the cost is visible at the
//! call site:
//!
//! ```rust,no_run
//! use cosmos_repo::domain::{Document, Filter};
//! use cosmos_repo::repository::Repository;
//!
//! # async fn example(repo: &Repository<Document>) -> cosmos_repo::domain::Result<()> {
//! // Parameterized SQL on the server
//! let open = repo.query_filter(Filter::new().eq("status", "open")).await?;
//!
//! // Full scan, predicate evaluated locally
//! let large = repo
//!     .query_where(|d| d.property("total").and_then(|t| t.as_u64()) > Some(100))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`domain::Result`]. Invalid arguments are rejected
//! before any request is sent; a status outside 200-299 becomes
//! [`domain::RepoError::Client`]:
//!
//! ```rust,no_run
//! use cosmos_repo::domain::{Document, RepoError};
//! use cosmos_repo::repository::Repository;
//!
//! # async fn example(repo: &Repository<Document>) {
//! match repo.delete("not-a-guid", "pk").await {
//!     Err(RepoError::Format(message)) => eprintln!("{message}"),
//!     Err(RepoError::Client(e)) => eprintln!("status {:?}", e.status()),
//!     _ => {}
//! }
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod repository;
