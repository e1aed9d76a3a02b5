//! Cosmos DB document store
//!
//! This module binds one database and one container of a Cosmos DB account
//! and implements [`DocumentStore`] on top of the Azure SDK.

use crate::adapters::cosmosdb::connection::ConnectionString;
use crate::adapters::database::traits::{
    DocumentStore, PageStream, QueryOptions, QueryPage, WriteResponse,
};
use crate::config::CosmosSettings;
use crate::domain::ids::PartitionKeyPath;
use crate::domain::query::SqlQuery;
use crate::domain::{CosmosDbError, RepoError, Result};
use async_trait::async_trait;
use azure_core::credentials::Secret;
use azure_data_cosmos::clients::{ContainerClient, DatabaseClient};
use azure_data_cosmos::models::{
    ContainerProperties, IndexingPolicy, PartitionKeyDefinition, PartitionKeyKind,
};
use azure_data_cosmos::{CosmosClient, CosmosClientOptions, ItemOptions, PartitionKey, Query};
use futures::stream::StreamExt;
use serde_json::Value;
use std::borrow::Cow;

/// Map an SDK error to a [`RepoError`], keeping the HTTP status
fn sdk_error(context: &str, error: azure_core::Error) -> RepoError {
    let status = error.http_status().map(u16::from);
    RepoError::CosmosDb(CosmosDbError::from_status(
        status,
        format!("{context}: {error}"),
    ))
}

/// The stored copy of a written document, if the response body holds one
fn stored_document(body: Option<Value>) -> Option<Value> {
    body.filter(|document| document.get("id").and_then(Value::as_str).is_some())
}

fn document_id(document: &Value) -> String {
    document
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Document store backed by a Cosmos DB container
///
/// The client, database and container handles are resolved once at
/// construction and reused by every call.
pub struct CosmosStore {
    /// Cosmos DB client
    client: CosmosClient,

    /// Database client
    database: DatabaseClient,

    /// Container client
    container: ContainerClient,

    database_name: String,
    container_name: String,
    endpoint: String,
}

impl CosmosStore {
    /// Connect using validated settings
    ///
    /// No request is sent; the SDK connects lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns an `Argument` error if a setting is empty, a `Configuration`
    /// error if the connection string is malformed, or `ConnectionFailed`
    /// if the SDK rejects the endpoint.
    pub fn connect(settings: &CosmosSettings) -> Result<Self> {
        use secrecy::ExposeSecret;

        settings.validate()?;
        let connection = ConnectionString::parse(settings.connection_string.expose_secret().as_str())?;

        let key = Secret::new(connection.expose_key());
        let options = Some(CosmosClientOptions::default());

        let client =
            CosmosClient::with_key(connection.account_endpoint(), key, options).map_err(|e| {
                RepoError::CosmosDb(CosmosDbError::ConnectionFailed(format!(
                    "Failed to create Cosmos client: {e}"
                )))
            })?;

        let database = client.database_client(&settings.database_name);
        let container = database.container_client(&settings.container_name);

        tracing::debug!(
            endpoint = %connection.account_endpoint(),
            database = %settings.database_name,
            container = %settings.container_name,
            "Cosmos DB client created"
        );

        Ok(Self {
            client,
            database,
            container,
            database_name: settings.database_name.clone(),
            container_name: settings.container_name.clone(),
            endpoint: connection.account_endpoint().to_string(),
        })
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Pair a write status with the stored document
    ///
    /// Falls back to a point read when the response carried no body, so
    /// callers always see server-assigned properties such as `_ts`.
    async fn settle_write(
        &self,
        status: u16,
        body: Option<Value>,
        id: &str,
        partition_key: &str,
    ) -> Result<WriteResponse> {
        if let Some(document) = stored_document(body) {
            return Ok(WriteResponse::with_document(status, document));
        }

        if !(200..300).contains(&status) || id.is_empty() {
            return Ok(WriteResponse::status_only(status));
        }

        tracing::debug!(id = %id, "Write returned no body, reading stored document");
        let document = self.read_document(id, partition_key).await?;
        Ok(WriteResponse::with_document(status, document))
    }

    fn build_query(query: &SqlQuery) -> Result<Query> {
        let mut sdk_query = Query::from(query.text().to_string());
        for parameter in query.parameters() {
            sdk_query = sdk_query
                .with_parameter(parameter.name.clone(), parameter.value.clone())
                .map_err(|e| {
                    RepoError::Format(format!(
                        "Cannot bind query parameter {}: {e}",
                        parameter.name
                    ))
                })?;
        }
        Ok(sdk_query)
    }
}

#[async_trait]
impl DocumentStore for CosmosStore {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    fn container_name(&self) -> &str {
        &self.container_name
    }

    async fn read_document(&self, id: &str, partition_key: &str) -> Result<Value> {
        tracing::debug!(id = %id, partition_key = %partition_key, "Reading document");

        let response = self
            .container
            .read_item::<Value>(PartitionKey::from(partition_key.to_string()), id, None)
            .await
            .map_err(|e| sdk_error("Failed to read document", e))?;

        response.into_body().map_err(|e| {
            RepoError::CosmosDb(CosmosDbError::DeserializationFailed(format!(
                "Failed to read document body: {e}"
            )))
        })
    }

    async fn create_document(&self, partition_key: &str, document: Value) -> Result<WriteResponse> {
        let id = document_id(&document);
        let options = ItemOptions {
            enable_content_response_on_write: true,
            ..Default::default()
        };

        let response = self
            .container
            .create_item(PartitionKey::from(partition_key.to_string()), document, Some(options))
            .await
            .map_err(|e| sdk_error("Failed to create document", e))?;

        let status = u16::from(response.status());
        let body = response.into_raw_body().json::<Value>().ok();
        self.settle_write(status, body, &id, partition_key).await
    }

    async fn upsert_document(&self, partition_key: &str, document: Value) -> Result<WriteResponse> {
        let id = document_id(&document);
        let options = ItemOptions {
            enable_content_response_on_write: true,
            ..Default::default()
        };

        let response = self
            .container
            .upsert_item(PartitionKey::from(partition_key.to_string()), document, Some(options))
            .await
            .map_err(|e| sdk_error("Failed to upsert document", e))?;

        let status = u16::from(response.status());
        let body = response.into_raw_body().json::<Value>().ok();
        self.settle_write(status, body, &id, partition_key).await
    }

    async fn replace_document(
        &self,
        id: &str,
        partition_key: &str,
        document: Value,
    ) -> Result<WriteResponse> {
        let options = ItemOptions {
            enable_content_response_on_write: true,
            ..Default::default()
        };

        let response = self
            .container
            .replace_item(
                PartitionKey::from(partition_key.to_string()),
                id,
                document,
                Some(options),
            )
            .await
            .map_err(|e| sdk_error("Failed to replace document", e))?;

        let status = u16::from(response.status());
        let body = response.into_raw_body().json::<Value>().ok();
        self.settle_write(status, body, id, partition_key).await
    }

    async fn delete_document(&self, id: &str, partition_key: &str) -> Result<WriteResponse> {
        let response = self
            .container
            .delete_item(PartitionKey::from(partition_key.to_string()), id, None)
            .await
            .map_err(|e| sdk_error("Failed to delete document", e))?;

        Ok(WriteResponse::status_only(u16::from(response.status())))
    }

    fn query_documents(&self, query: &SqlQuery, options: QueryOptions) -> Result<PageStream> {
        let sdk_query = Self::build_query(query)?;

        tracing::debug!(
            query = %query.text(),
            partition_key = ?options.partition_key,
            resumed = options.continuation.is_some(),
            "Starting query"
        );

        let pager = match options.partition_key {
            Some(pk) => self
                .container
                .query_items::<Value>(sdk_query, PartitionKey::from(pk), None),
            None => self.container.query_items::<Value>(sdk_query, (), None),
        }
        .map_err(|e| sdk_error("Failed to create query", e))?;

        let mut pages = pager.into_pages();
        if let Some(token) = options.continuation {
            pages = pages.with_continuation_token(token);
        }

        let stream = pages.map(|page| {
            let page = page.map_err(|e| sdk_error("Failed to fetch query page", e))?;
            let continuation = page.continuation().map(str::to_string);
            Ok(QueryPage {
                items: page.into_items(),
                continuation,
            })
        });

        Ok(stream.boxed())
    }

    async fn ensure_database(&self, database_id: &str) -> Result<u16> {
        let database = self.client.database_client(database_id);

        match database.read(None).await {
            Ok(response) => {
                tracing::info!(database = %database_id, "Database already exists");
                Ok(u16::from(response.status()))
            }
            Err(e) if e.http_status().map(u16::from) == Some(404) => {
                tracing::info!(database = %database_id, "Creating database");

                let response = self
                    .client
                    .create_database(database_id, None)
                    .await
                    .map_err(|e| sdk_error("Failed to create database", e))?;

                tracing::info!(database = %database_id, "Database created successfully");
                Ok(u16::from(response.status()))
            }
            Err(e) => Err(sdk_error("Failed to read database", e)),
        }
    }

    async fn ensure_container(
        &self,
        container_id: &str,
        partition_key_path: &PartitionKeyPath,
    ) -> Result<u16> {
        let container = self.database.container_client(container_id);

        match container.read(None).await {
            Ok(response) => {
                tracing::info!(container = %container_id, "Container already exists");
                Ok(u16::from(response.status()))
            }
            Err(e) if e.http_status().map(u16::from) == Some(404) => {
                tracing::info!(
                    container = %container_id,
                    partition_key = %partition_key_path,
                    "Creating container"
                );

                let properties = ContainerProperties {
                    id: Cow::Owned(container_id.to_string()),
                    partition_key: PartitionKeyDefinition {
                        paths: vec![partition_key_path.as_str().to_string()],
                        kind: PartitionKeyKind::Hash,
                        version: None,
                    },
                    indexing_policy: Some(IndexingPolicy::default()),
                    ..Default::default()
                };

                let response = self
                    .database
                    .create_container(properties, None)
                    .await
                    .map_err(|e| sdk_error("Failed to create container", e))?;

                tracing::info!(container = %container_id, "Container created successfully");
                Ok(u16::from(response.status()))
            }
            Err(e) => Err(sdk_error("Failed to read container", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret::secret_string;
    use serde_json::json;

    fn settings(connection_string: &str) -> CosmosSettings {
        CosmosSettings {
            connection_string: secret_string(connection_string.to_string()),
            database_name: "orders".to_string(),
            container_name: "items".to_string(),
            partition_key_path: PartitionKeyPath::default(),
        }
    }

    #[test]
    fn test_connect_binds_names_without_network() {
        let store = CosmosStore::connect(&settings(
            "AccountEndpoint=https://test.documents.azure.com:443/;AccountKey=dGVzdC1rZXk=;",
        ))
        .unwrap();

        assert_eq!(store.database_name(), "orders");
        assert_eq!(store.container_name(), "items");
        assert_eq!(store.endpoint(), "https://test.documents.azure.com:443/");
    }

    #[test]
    fn test_connect_rejects_empty_connection_string() {
        let err = CosmosStore::connect(&settings("")).err().unwrap();
        assert!(matches!(err, RepoError::Argument { ref argument, .. } if argument == "ConnectionString"));
    }

    #[test]
    fn test_connect_rejects_malformed_connection_string() {
        let err = CosmosStore::connect(&settings("AccountKey=abc")).err().unwrap();
        assert!(matches!(err, RepoError::Configuration(_)));
    }

    #[test]
    fn test_stored_document_keeps_server_properties() {
        let body = json!({"id": "a1", "name": "widget", "_ts": 1700000000, "_etag": "\"0001\""});

        let stored = stored_document(Some(body)).unwrap();

        assert_eq!(stored["_ts"], json!(1700000000));
        assert_eq!(document_id(&stored), "a1");
    }

    #[test]
    fn test_stored_document_ignores_empty_bodies() {
        assert!(stored_document(None).is_none());
        assert!(stored_document(Some(Value::Null)).is_none());
        assert!(stored_document(Some(json!({"message": "accepted"}))).is_none());
    }

    #[test]
    fn test_build_query_binds_parameters() {
        let query = SqlQuery::new("SELECT * FROM c WHERE c.name = @name")
            .with_parameter("@name", "widget")
            .unwrap();
        assert!(CosmosStore::build_query(&query).is_ok());
    }
}
