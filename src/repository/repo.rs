//! Typed repository over a document store
//!
//! [`Repository`] validates arguments, assigns identifiers, extracts
//! partition keys, drains paginated queries and translates status codes.
//! Every call is forwarded to a [`DocumentStore`].

use crate::adapters::database::traits::{DocumentStore, PageStream, QueryOptions};
use crate::adapters::database::create_document_store;
use crate::config::CosmosSettings;
use crate::domain::ids::{self, PartitionKeyPath};
use crate::domain::query::{Filter, SqlQuery};
use crate::domain::{Entity, RepoError, Result};
use crate::repository::page::Page;
use crate::repository::status::ensure_success;
use futures::stream::TryStreamExt;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Repository for one entity type in one container
///
/// Holds the store handle for its lifetime. After [`Repository::close`]
/// every operation fails with [`RepoError::Disposed`].
///
/// # Examples
///
/// ```
/// use cosmos_repo::adapters::memory::MemoryStore;
/// use cosmos_repo::domain::{Document, PartitionKeyPath};
/// use cosmos_repo::repository::Repository;
/// use std::sync::Arc;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = Arc::new(MemoryStore::new("shop", "orders"));
/// let repo: Repository<Document> = Repository::with_store(store, PartitionKeyPath::default());
///
/// let saved = repo
///     .insert(Document::new("").with_property("total", 42))
///     .await
///     .unwrap();
/// let loaded = repo.get(&saved.id, &saved.id).await.unwrap();
/// assert_eq!(loaded.property("total"), Some(&serde_json::json!(42)));
/// # });
/// ```
pub struct Repository<T: Entity> {
    store: Option<Arc<dyn DocumentStore>>,
    partition_key_path: PartitionKeyPath,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Repository<T> {
    /// Connect to the container described by `settings`
    ///
    /// # Errors
    ///
    /// Returns an `Argument` error naming the first empty setting
    /// (`ConnectionString`, `DatabaseName`, `ContainerName`), or a
    /// `Configuration` error if the connection string is malformed.
    pub fn connect(settings: &CosmosSettings) -> Result<Self> {
        settings.validate()?;
        let store = create_document_store(settings)?;
        Ok(Self::with_store(store, settings.partition_key_path.clone()))
    }

    /// Connect from raw values, with the same validation as [`Repository::connect`]
    pub fn from_parts(
        connection_string: &str,
        database_name: &str,
        container_name: &str,
    ) -> Result<Self> {
        Self::connect(&CosmosSettings::new(
            connection_string,
            database_name,
            container_name,
        ))
    }

    /// Wrap an existing store
    pub fn with_store(store: Arc<dyn DocumentStore>, partition_key_path: PartitionKeyPath) -> Self {
        Self {
            store: Some(store),
            partition_key_path,
            _entity: PhantomData,
        }
    }

    /// Partition key path used to locate partition key values in documents
    pub fn partition_key_path(&self) -> &PartitionKeyPath {
        &self.partition_key_path
    }

    /// Whether [`Repository::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.store.is_none()
    }

    /// Release the store handle
    ///
    /// Calling this more than once has no effect.
    pub fn close(&mut self) {
        if let Some(store) = self.store.take() {
            tracing::debug!(container = %store.container_name(), "Repository closed");
        }
    }

    fn store(&self) -> Result<&Arc<dyn DocumentStore>> {
        self.store.as_ref().ok_or(RepoError::Disposed)
    }

    // ---- reads ----

    /// Point read by identifier and partition key
    ///
    /// # Errors
    ///
    /// Fails with an `Argument` error if either value is empty, or with
    /// the store's not-found error if no such document exists.
    pub async fn get(&self, id: &str, partition_key: &str) -> Result<T> {
        require_non_empty("id", id)?;
        require_non_empty("partitionKey", partition_key)?;
        let store = self.store()?;

        tracing::debug!(
            container = %store.container_name(),
            id = %id,
            partition_key = %partition_key,
            "Reading element"
        );

        let document = store.read_document(id, partition_key).await?;
        Ok(serde_json::from_value(document)?)
    }

    /// First document whose `id` matches, searching every partition
    ///
    /// Returns `Ok(None)` when nothing matches.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<T>> {
        require_non_empty("id", id)?;
        let query = Filter::new().eq("id", id).into_query();

        let mut pages = self.start_query(&query, QueryOptions::default())?;
        while let Some(page) = pages.try_next().await? {
            if let Some(first) = page.items.into_iter().next() {
                return Ok(Some(serde_json::from_value(first)?));
            }
        }
        Ok(None)
    }

    /// Every document in the container
    pub async fn query_all(&self) -> Result<Vec<T>> {
        self.query(SqlQuery::select_all()).await
    }

    /// Run a query and collect every page
    ///
    /// # Errors
    ///
    /// Fails with an `Argument` error if the query text is empty.
    pub async fn query(&self, query: SqlQuery) -> Result<Vec<T>> {
        query.require_text()?;
        self.drain(&query, QueryOptions::default()).await
    }

    /// Run an unparameterized query
    pub async fn query_text(&self, query_text: &str) -> Result<Vec<T>> {
        self.query(SqlQuery::new(query_text)).await
    }

    /// Resume a query from a continuation token and collect the remaining pages
    ///
    /// # Errors
    ///
    /// Fails with an `Argument` error if the query text or the token is empty.
    pub async fn query_from(&self, query: SqlQuery, continuation_token: &str) -> Result<Vec<T>> {
        query.require_text()?;
        require_non_empty("continuationToken", continuation_token)?;

        let options = QueryOptions {
            partition_key: None,
            continuation: Some(continuation_token.to_string()),
        };
        self.drain(&query, options).await
    }

    /// Fetch a single page, optionally resuming from a continuation token
    pub async fn query_page(
        &self,
        query: SqlQuery,
        continuation_token: Option<&str>,
    ) -> Result<Page<T>> {
        query.require_text()?;
        if let Some(token) = continuation_token {
            require_non_empty("continuationToken", token)?;
        }

        let options = QueryOptions {
            partition_key: None,
            continuation: continuation_token.map(str::to_string),
        };
        let mut pages = self.start_query(&query, options)?;

        match pages.try_next().await? {
            Some(page) => Ok(Page {
                items: deserialize_all(page.items)?,
                continuation_token: page.continuation,
            }),
            None => Ok(Page::default()),
        }
    }

    /// Filter every document in process
    ///
    /// The whole container is read; prefer [`Repository::query_filter`]
    /// when the condition can run on the server.
    pub async fn query_where<F>(&self, predicate: F) -> Result<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.query_all().await?;
        Ok(all.into_iter().filter(|item| predicate(item)).collect())
    }

    /// Run a server-side equality filter
    pub async fn query_filter(&self, filter: Filter) -> Result<Vec<T>> {
        self.query(filter.into_query()).await
    }

    /// Number of documents in the first page of a select-all query
    ///
    /// This is the page size, not the container size, once the container
    /// holds more than one page. Use [`Repository::count_all`] for a total.
    pub async fn count(&self) -> Result<usize> {
        let mut pages = self.start_query(&SqlQuery::select_all(), QueryOptions::default())?;
        let count = pages
            .try_next()
            .await?
            .map(|page| page.items.len())
            .unwrap_or(0);
        Ok(count)
    }

    /// Number of documents in the container, across all pages
    pub async fn count_all(&self) -> Result<usize> {
        let mut pages = self.start_query(&SqlQuery::select_all(), QueryOptions::default())?;
        let mut total = 0;
        while let Some(page) = pages.try_next().await? {
            total += page.items.len();
        }
        Ok(total)
    }

    /// Number of documents matching an in-process predicate
    pub async fn count_where<F>(&self, predicate: F) -> Result<usize>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.query_where(predicate).await?.len())
    }

    // ---- writes ----

    /// Create a new document
    ///
    /// An empty or all-zero identifier is replaced with a new GUID.
    ///
    /// # Errors
    ///
    /// - `Format` if the identifier is set but is not a GUID
    /// - `Client` if the store answers outside 200-299
    pub async fn insert(&self, mut element: T) -> Result<T> {
        assign_id_if_unassigned(&mut element)?;
        let store = self.store()?;
        let (document, partition_key) = self.prepare(&element)?;

        tracing::debug!(
            container = %store.container_name(),
            id = %element.id(),
            partition_key = %partition_key,
            "Inserting element"
        );

        let response = store.create_document(&partition_key, document).await?;
        ensure_success(response.status, "insert element")?;
        written(element, response.document)
    }

    /// Create or replace a document
    ///
    /// Uses the same identifier policy as [`Repository::insert`].
    pub async fn upsert(&self, mut element: T) -> Result<T> {
        assign_id_if_unassigned(&mut element)?;
        let store = self.store()?;
        let (document, partition_key) = self.prepare(&element)?;

        tracing::debug!(
            container = %store.container_name(),
            id = %element.id(),
            partition_key = %partition_key,
            "Upserting element"
        );

        let response = store.upsert_document(&partition_key, document).await?;
        ensure_success(response.status, "upsert element")?;
        written(element, response.document)
    }

    /// Replace an existing document, partition key taken from the element
    ///
    /// # Errors
    ///
    /// Fails before any store call if the identifier is empty, all-zero or
    /// not a GUID.
    pub async fn update(&self, element: T) -> Result<T> {
        ids::require_assigned("id", element.id())?;
        let (document, partition_key) = self.prepare(&element)?;
        self.replace(element, document, &partition_key).await
    }

    /// Replace an existing document in an explicit partition
    pub async fn update_in_partition(&self, element: T, partition_key: &str) -> Result<T> {
        ids::require_assigned("id", element.id())?;
        require_non_empty("partitionKey", partition_key)?;
        let document = self.to_document(&element)?;
        self.replace(element, document, partition_key).await
    }

    async fn replace(&self, element: T, document: Value, partition_key: &str) -> Result<T> {
        let store = self.store()?;

        tracing::debug!(
            container = %store.container_name(),
            id = %element.id(),
            partition_key = %partition_key,
            "Replacing element"
        );

        let response = store
            .replace_document(element.id(), partition_key, document)
            .await?;
        ensure_success(response.status, "update element")?;
        written(element, response.document)
    }

    /// Delete by identifier and partition key
    ///
    /// # Errors
    ///
    /// Fails before any store call if the identifier is empty, all-zero or
    /// not a GUID, or if the partition key is empty.
    pub async fn delete(&self, id: &str, partition_key: &str) -> Result<()> {
        ids::require_assigned("id", id)?;
        require_non_empty("partitionKey", partition_key)?;
        let store = self.store()?;

        tracing::debug!(
            container = %store.container_name(),
            id = %id,
            partition_key = %partition_key,
            "Deleting element"
        );

        let response = store.delete_document(id, partition_key).await?;
        ensure_success(response.status, "delete element")
    }

    /// Delete an element, partition key taken from the element
    pub async fn delete_element(&self, element: &T) -> Result<()> {
        ids::require_assigned("id", element.id())?;
        let (_, partition_key) = self.prepare(element)?;
        self.delete(element.id(), &partition_key).await
    }

    // ---- administration ----

    /// Create a database unless it already exists
    pub async fn create_database(&self, database_id: &str) -> Result<()> {
        require_non_empty("id", database_id)?;
        let status = self.store()?.ensure_database(database_id).await?;
        ensure_success(status, "create database")
    }

    /// Create a container in the bound database unless it already exists
    ///
    /// # Errors
    ///
    /// Fails with an `Argument` error if `container_id` is empty or
    /// `partition_key_path` does not start with `/`.
    pub async fn create_container(&self, container_id: &str, partition_key_path: &str) -> Result<()> {
        require_non_empty("id", container_id)?;
        require_non_empty("partitionKeyPath", partition_key_path)?;
        let path = PartitionKeyPath::new(partition_key_path)
            .map_err(|message| RepoError::argument("partitionKeyPath", message))?;

        let status = self.store()?.ensure_container(container_id, &path).await?;
        ensure_success(status, "create container")
    }

    // ---- helpers ----

    fn start_query(&self, query: &SqlQuery, options: QueryOptions) -> Result<PageStream> {
        let store = self.store()?;
        tracing::debug!(container = %store.container_name(), query = %query.text(), "Querying");
        store.query_documents(query, options)
    }

    /// Await each page before requesting the next, keeping service order
    async fn drain(&self, query: &SqlQuery, options: QueryOptions) -> Result<Vec<T>> {
        let mut pages = self.start_query(query, options)?;
        let mut items = Vec::new();
        let mut page_count = 0usize;

        while let Some(page) = pages.try_next().await? {
            page_count += 1;
            items.extend(deserialize_all(page.items)?);
        }

        tracing::debug!(pages = page_count, count = items.len(), "Query drained");
        Ok(items)
    }

    fn to_document(&self, element: &T) -> Result<Value> {
        let document = serde_json::to_value(element)?;
        match document.get("id").and_then(Value::as_str) {
            Some(id) if id == element.id() => Ok(document),
            _ => Err(RepoError::Format(
                "Element must serialize to a JSON object with a string `id` matching Entity::id"
                    .to_string(),
            )),
        }
    }

    fn prepare(&self, element: &T) -> Result<(Value, String)> {
        let document = self.to_document(element)?;
        let partition_key = self.partition_key_of(&document)?;
        Ok((document, partition_key))
    }

    fn partition_key_of(&self, document: &Value) -> Result<String> {
        match self.partition_key_path.value_in(document) {
            Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
            _ => Err(RepoError::argument(
                "partitionKey",
                format!(
                    "Element has no string value at partition key path {}",
                    self.partition_key_path
                ),
            )),
        }
    }
}

fn require_non_empty(argument: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RepoError::empty_argument(argument));
    }
    Ok(())
}

fn assign_id_if_unassigned<T: Entity>(element: &mut T) -> Result<()> {
    if ids::is_unassigned(element.id())? {
        element.set_id(ids::new_document_id());
    }
    Ok(())
}

fn deserialize_all<T: Entity>(items: Vec<Value>) -> Result<Vec<T>> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(RepoError::from))
        .collect()
}

/// The stored document if the store returned one, else what was sent
fn written<T: Entity>(element: T, stored: Option<Value>) -> Result<T> {
    match stored {
        Some(document) => Ok(serde_json::from_value(document)?),
        None => Ok(element),
    }
}
