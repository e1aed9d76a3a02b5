//! In-memory document store
//!
//! A [`DocumentStore`] that keeps documents in process. It understands the
//! queries the repository generates itself (select-all and [`Filter`]
//! queries) and pages results so continuation handling can be exercised
//! without a Cosmos DB account.
//!
//! [`Filter`]: crate::domain::Filter

use crate::adapters::database::traits::{
    DocumentStore, PageStream, QueryOptions, QueryPage, WriteResponse,
};
use crate::domain::ids::PartitionKeyPath;
use crate::domain::query::SqlQuery;
use crate::domain::{CosmosDbError, RepoError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug)]
struct StoredDocument {
    partition_key: String,
    id: String,
    body: Value,
}

#[derive(Debug, Default)]
struct State {
    /// Insertion order is query order
    documents: Vec<StoredDocument>,
    databases: BTreeSet<String>,
    containers: BTreeMap<String, PartitionKeyPath>,
    forced_status: Option<u16>,
}

impl State {
    fn position(&self, id: &str, partition_key: &str) -> Option<usize> {
        self.documents
            .iter()
            .position(|d| d.id == id && d.partition_key == partition_key)
    }
}

/// In-process document store
pub struct MemoryStore {
    database_name: String,
    container_name: String,
    page_size: usize,
    state: Mutex<State>,
    calls: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store with the database and container already present
    pub fn new(database_name: impl Into<String>, container_name: impl Into<String>) -> Self {
        let database_name = database_name.into();
        let container_name = container_name.into();

        let mut state = State::default();
        state.databases.insert(database_name.clone());
        state
            .containers
            .insert(container_name.clone(), PartitionKeyPath::default());

        Self {
            database_name,
            container_name,
            page_size: DEFAULT_PAGE_SIZE,
            state: Mutex::new(state),
            calls: AtomicUsize::new(0),
        }
    }

    /// Sets how many documents a query page holds (minimum 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Number of store calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.state().documents.len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a database has been created
    pub fn has_database(&self, database_id: &str) -> bool {
        self.state().databases.contains(database_id)
    }

    /// Partition key path of a created container
    pub fn container_partition_key(&self, container_id: &str) -> Option<PartitionKeyPath> {
        self.state().containers.get(container_id).cloned()
    }

    /// Makes every later write and admin call report `status`
    ///
    /// A non-2xx status leaves the stored data untouched. `None` restores
    /// normal behavior.
    pub fn set_forced_status(&self, status: Option<u16>) {
        self.state().forced_status = status;
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns the forced status, and whether the call should still mutate
    fn outcome(state: &State, default_status: u16) -> (u16, bool) {
        match state.forced_status {
            Some(status) => (status, (200..300).contains(&status)),
            None => (default_status, true),
        }
    }

    fn stamp(document: &mut Value) {
        if let Value::Object(map) = document {
            map.insert("_ts".to_string(), Value::from(chrono::Utc::now().timestamp()));
        }
    }

    fn document_id(document: &Value) -> Result<String> {
        document
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                RepoError::CosmosDb(CosmosDbError::RequestFailed {
                    status: Some(400),
                    message: "Document has no string id".to_string(),
                })
            })
    }

    fn not_found(id: &str, partition_key: &str) -> RepoError {
        RepoError::CosmosDb(CosmosDbError::NotFound(format!(
            "Document {id} not found in partition {partition_key}"
        )))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.database_name
    }

    fn container_name(&self) -> &str {
        &self.container_name
    }

    async fn read_document(&self, id: &str, partition_key: &str) -> Result<Value> {
        self.record_call();
        let state = self.state();
        state
            .position(id, partition_key)
            .map(|index| state.documents[index].body.clone())
            .ok_or_else(|| Self::not_found(id, partition_key))
    }

    async fn create_document(&self, partition_key: &str, mut document: Value) -> Result<WriteResponse> {
        self.record_call();
        let id = Self::document_id(&document)?;
        let mut state = self.state();

        if state.position(&id, partition_key).is_some() {
            return Err(RepoError::CosmosDb(CosmosDbError::Conflict(format!(
                "Document {id} already exists"
            ))));
        }

        let (status, apply) = Self::outcome(&state, 201);
        if !apply {
            return Ok(WriteResponse::status_only(status));
        }

        Self::stamp(&mut document);
        state.documents.push(StoredDocument {
            partition_key: partition_key.to_string(),
            id,
            body: document.clone(),
        });

        Ok(WriteResponse::with_document(status, document))
    }

    async fn upsert_document(&self, partition_key: &str, mut document: Value) -> Result<WriteResponse> {
        self.record_call();
        let id = Self::document_id(&document)?;
        let mut state = self.state();

        let existing = state.position(&id, partition_key);
        let (status, apply) = Self::outcome(&state, if existing.is_some() { 200 } else { 201 });
        if !apply {
            return Ok(WriteResponse::status_only(status));
        }

        Self::stamp(&mut document);
        match existing {
            Some(index) => state.documents[index].body = document.clone(),
            None => state.documents.push(StoredDocument {
                partition_key: partition_key.to_string(),
                id,
                body: document.clone(),
            }),
        }

        Ok(WriteResponse::with_document(status, document))
    }

    async fn replace_document(
        &self,
        id: &str,
        partition_key: &str,
        mut document: Value,
    ) -> Result<WriteResponse> {
        self.record_call();
        let mut state = self.state();

        let index = state
            .position(id, partition_key)
            .ok_or_else(|| Self::not_found(id, partition_key))?;

        let (status, apply) = Self::outcome(&state, 200);
        if !apply {
            return Ok(WriteResponse::status_only(status));
        }

        Self::stamp(&mut document);
        state.documents[index].body = document.clone();

        Ok(WriteResponse::with_document(status, document))
    }

    async fn delete_document(&self, id: &str, partition_key: &str) -> Result<WriteResponse> {
        self.record_call();
        let mut state = self.state();

        let index = state
            .position(id, partition_key)
            .ok_or_else(|| Self::not_found(id, partition_key))?;

        let (status, apply) = Self::outcome(&state, 204);
        if apply {
            state.documents.remove(index);
        }
        Ok(WriteResponse::status_only(status))
    }

    fn query_documents(&self, query: &SqlQuery, options: QueryOptions) -> Result<PageStream> {
        self.record_call();

        if query.filter().is_none() && !query.is_select_all() {
            return Err(RepoError::CosmosDb(CosmosDbError::RequestFailed {
                status: Some(400),
                message: format!("Unsupported query for in-memory store: {}", query.text()),
            }));
        }

        let start = match options.continuation.as_deref() {
            Some(token) => token.parse::<usize>().map_err(|_| {
                RepoError::CosmosDb(CosmosDbError::RequestFailed {
                    status: Some(400),
                    message: format!("Invalid continuation token: {token}"),
                })
            })?,
            None => 0,
        };

        let matching: Vec<Value> = {
            let state = self.state();
            state
                .documents
                .iter()
                .filter(|d| {
                    options
                        .partition_key
                        .as_deref()
                        .map_or(true, |pk| d.partition_key == pk)
                })
                .filter(|d| query.filter().map_or(true, |f| f.matches(&d.body)))
                .map(|d| d.body.clone())
                .collect()
        };

        let page_size = self.page_size;
        let mut pages = Vec::new();
        let mut offset = start.min(matching.len());
        loop {
            let end = (offset + page_size).min(matching.len());
            let continuation = (end < matching.len()).then(|| end.to_string());
            pages.push(Ok(QueryPage {
                items: matching[offset..end].to_vec(),
                continuation: continuation.clone(),
            }));
            if continuation.is_none() {
                break;
            }
            offset = end;
        }

        Ok(stream::iter(pages).boxed())
    }

    async fn ensure_database(&self, database_id: &str) -> Result<u16> {
        self.record_call();
        let mut state = self.state();

        let exists = state.databases.contains(database_id);
        let (status, apply) = Self::outcome(&state, if exists { 200 } else { 201 });
        if apply {
            state.databases.insert(database_id.to_string());
        }
        Ok(status)
    }

    async fn ensure_container(
        &self,
        container_id: &str,
        partition_key_path: &PartitionKeyPath,
    ) -> Result<u16> {
        self.record_call();
        let mut state = self.state();

        let exists = state.containers.contains_key(container_id);
        let (status, apply) = Self::outcome(&state, if exists { 200 } else { 201 });
        if apply && !exists {
            state
                .containers
                .insert(container_id.to_string(), partition_key_path.clone());
        }
        Ok(status)
    }
}
