//! Document store factory
//!
//! This module creates document stores from settings.

use crate::adapters::cosmosdb::CosmosStore;
use crate::adapters::database::traits::DocumentStore;
use crate::config::CosmosSettings;
use crate::domain::Result;
use std::sync::Arc;

/// Create a Cosmos DB document store from settings
///
/// Resolves client, database and container handles once; the returned
/// store is shared read-only by every repository built on it.
///
/// # Errors
///
/// Returns an error if the connection string is malformed or the client
/// cannot be created.
pub fn create_document_store(settings: &CosmosSettings) -> Result<Arc<dyn DocumentStore>> {
    tracing::info!(
        database = %settings.database_name,
        container = %settings.container_name,
        "Creating Cosmos DB document store"
    );
    let store = CosmosStore::connect(settings)?;
    Ok(Arc::new(store) as Arc<dyn DocumentStore>)
}
