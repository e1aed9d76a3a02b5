//! Domain types for the repository.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Error types** ([`RepoError`], [`CosmosClientError`], [`CosmosDbError`])
//! - **Result type alias** ([`Result`])
//! - **The entity contract** ([`Entity`]) and a schemaless [`Document`]
//! - **Identifier helpers** ([`ids`]) for GUID identifiers and partition key paths
//! - **Query definitions** ([`SqlQuery`], [`Filter`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, RepoError>`]:
//!
//! ```rust
//! use cosmos_repo::domain::{ids, Result};
//!
//! fn example(id: &str) -> Result<()> {
//!     ids::require_assigned("id", id)?;
//!     Ok(())
//! }
//!
//! assert!(example("not-a-guid").is_err());
//! ```

pub mod entity;
pub mod errors;
pub mod ids;
pub mod query;
pub mod result;

// Re-export commonly used types for convenience
pub use entity::{Document, Entity};
pub use errors::{CosmosClientError, CosmosDbError, RepoError};
pub use ids::PartitionKeyPath;
pub use query::{Filter, QueryParameter, SqlQuery};
pub use result::Result;
