//! Document store abstraction
//!
//! This module defines the trait that document store adapters implement.
//! Documents cross this boundary as raw JSON; typing happens in the repository.

use crate::domain::ids::PartitionKeyPath;
use crate::domain::query::SqlQuery;
use crate::domain::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

/// Outcome of a write operation
#[derive(Debug, Clone)]
pub struct WriteResponse {
    /// Status code reported by the service
    pub status: u16,

    /// The stored document, when the service returns it
    pub document: Option<Value>,
}

impl WriteResponse {
    /// A response without a body
    pub fn status_only(status: u16) -> Self {
        Self {
            status,
            document: None,
        }
    }

    /// A response carrying the stored document
    pub fn with_document(status: u16, document: Value) -> Self {
        Self {
            status,
            document: Some(document),
        }
    }
}

/// One page of query results
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    /// Documents in this page, in service order
    pub items: Vec<Value>,

    /// Cursor for the page after this one
    pub continuation: Option<String>,
}

/// Options for a query
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Scope the query to one partition; `None` queries across partitions
    pub partition_key: Option<String>,

    /// Resume from a continuation token returned by an earlier page
    pub continuation: Option<String>,
}

/// Stream of query pages, polled one page at a time
pub type PageStream = BoxStream<'static, Result<QueryPage>>;

/// Document store trait
///
/// A store is bound to one database and one container. Errors reported by
/// the service are returned as [`crate::domain::CosmosDbError`]; successful
/// calls report the status code so callers can apply their own policy.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the bound database
    fn database_name(&self) -> &str;

    /// Name of the bound container
    fn container_name(&self) -> &str;

    /// Point read by identifier and partition key
    ///
    /// # Errors
    ///
    /// Returns `CosmosDbError::NotFound` if the document does not exist.
    async fn read_document(&self, id: &str, partition_key: &str) -> Result<Value>;

    /// Create a new document
    async fn create_document(&self, partition_key: &str, document: Value) -> Result<WriteResponse>;

    /// Create or replace a document
    async fn upsert_document(&self, partition_key: &str, document: Value) -> Result<WriteResponse>;

    /// Replace an existing document
    async fn replace_document(
        &self,
        id: &str,
        partition_key: &str,
        document: Value,
    ) -> Result<WriteResponse>;

    /// Delete a document
    async fn delete_document(&self, id: &str, partition_key: &str) -> Result<WriteResponse>;

    /// Start a query and return its pages as a stream
    ///
    /// No request is sent until the stream is polled.
    fn query_documents(&self, query: &SqlQuery, options: QueryOptions) -> Result<PageStream>;

    /// Create a database if it does not exist
    ///
    /// Returns the status of the call that settled it (existing or created).
    async fn ensure_database(&self, database_id: &str) -> Result<u16>;

    /// Create a container in the bound database if it does not exist
    async fn ensure_container(
        &self,
        container_id: &str,
        partition_key_path: &PartitionKeyPath,
    ) -> Result<u16>;
}
