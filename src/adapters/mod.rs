//! Document store adapters.
//!
//! This module provides the storage side of the repository:
//!
//! - [`database`] - Document store abstraction (trait-based)
//! - [`cosmosdb`] - Azure Cosmos DB implementation
//! - [`memory`] - In-process implementation for tests and local runs
//!
//! # Design Pattern
//!
//! Adapters isolate the Azure SDK behind [`database::DocumentStore`] so the
//! repository can be exercised against [`memory::MemoryStore`].
//!
//! ```rust,no_run
//! use cosmos_repo::adapters::database::create_document_store;
//! use cosmos_repo::config::CosmosSettings;
//!
//! # fn example() -> cosmos_repo::domain::Result<()> {
//! let settings = CosmosSettings::new(
//!     "AccountEndpoint=https://account.documents.azure.com:443/;AccountKey=a2V5;",
//!     "orders",
//!     "items",
//! );
//! let store = create_document_store(&settings)?;
//! assert_eq!(store.container_name(), "items");
//! # Ok(())
//! # }
//! ```

pub mod cosmosdb;
pub mod database;
pub mod memory;
