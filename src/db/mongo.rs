//! MongoDB client and collection wrapper

use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::{
    options::{IndexOptions, UpdateModifications},
    results::UpdateResult,
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::db::PlannedQuery;
use crate::types::{EduHubError, Result};

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// MongoDB client wrapper
///
/// Cheap to clone; every accessor and report takes one by reference.
#[derive(Clone, Debug)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a new MongoDB client and verify it with a ping
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB at {}", uri);

        let timeout_uri = with_timeouts(uri);

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| EduHubError::Connection(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| EduHubError::Connection(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection
    pub fn collection<T>(&self, name: &str) -> MongoCollection<T>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync,
    {
        MongoCollection::new(&self.client, &self.db_name, name)
    }

    /// Run a raw database command
    pub async fn run_command(&self, command: Document) -> Result<Document> {
        self.database()
            .run_command(command)
            .await
            .map_err(|e| EduHubError::from_driver("Command failed", e))
    }

    /// Drop the whole database
    pub async fn drop_database(&self) -> Result<()> {
        self.database()
            .drop()
            .await
            .map_err(|e| EduHubError::from_driver("Drop database failed", e))
    }

    /// Get the database handle
    pub fn database(&self) -> mongodb::Database {
        self.client.database(&self.db_name)
    }

    /// Get the raw MongoDB client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Append server selection and connect timeouts so an unreachable server
/// fails fast instead of hanging
fn with_timeouts(uri: &str) -> String {
    const TIMEOUTS: &str = "serverSelectionTimeoutMS=3000&connectTimeoutMS=3000";

    if uri.contains('?') {
        return format!("{}&{}", uri, TIMEOUTS);
    }

    let after_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    if after_scheme.contains('/') {
        format!("{}?{}", uri, TIMEOUTS)
    } else {
        format!("{}/?{}", uri, TIMEOUTS)
    }
}

/// Typed MongoDB collection
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    /// Bind to a collection; nothing is sent to the server
    pub fn new(client: &Client, db_name: &str, collection_name: &str) -> Self {
        MongoCollection {
            inner: client.database(db_name).collection::<T>(collection_name),
        }
    }

    /// Collection name
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Insert a document
    pub async fn insert_one(&self, item: T) -> Result<ObjectId> {
        let result = self
            .inner
            .insert_one(item)
            .await
            .map_err(|e| EduHubError::from_driver("Insert failed", e))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| EduHubError::Database("Failed to get inserted ID".into()))
    }

    /// Insert a batch of documents, returning how many were written
    pub async fn insert_many(&self, items: Vec<T>) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let result = self
            .inner
            .insert_many(items)
            .await
            .map_err(|e| EduHubError::from_driver("Insert many failed", e))?;

        Ok(result.inserted_ids.len())
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| EduHubError::from_driver("Find failed", e))
    }

    /// Find many documents by filter
    pub async fn find_many(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self
            .inner
            .find(filter)
            .await
            .map_err(|e| EduHubError::from_driver("Find failed", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| EduHubError::from_driver("Reading documents failed", e))
    }

    /// Find many documents by filter with a sort order
    pub async fn find_sorted(&self, filter: Document, sort: Document) -> Result<Vec<T>> {
        let cursor = self
            .inner
            .find(filter)
            .sort(sort)
            .await
            .map_err(|e| EduHubError::from_driver("Find failed", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| EduHubError::from_driver("Reading documents failed", e))
    }

    /// Execute a planned find against this collection
    pub async fn find_planned(&self, query: PlannedQuery) -> Result<Vec<T>> {
        match query {
            PlannedQuery::Find {
                filter,
                sort: Some(order),
                ..
            } => self.find_sorted(filter, order).await,
            PlannedQuery::Find { filter, .. } => self.find_many(filter).await,
            PlannedQuery::Aggregate { pipeline, .. } => self.aggregate(pipeline).await,
        }
    }

    /// Count documents matching a filter
    pub async fn count(&self, filter: Document) -> Result<u64> {
        self.inner
            .count_documents(filter)
            .await
            .map_err(|e| EduHubError::from_driver("Count failed", e))
    }

    /// Update one document
    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        self.inner
            .update_one(filter, update)
            .await
            .map_err(|e| EduHubError::from_driver("Update failed", e))
    }

    /// Hard delete one document, returning whether anything matched
    pub async fn delete_one(&self, filter: Document) -> Result<bool> {
        let result = self
            .inner
            .delete_one(filter)
            .await
            .map_err(|e| EduHubError::from_driver("Delete failed", e))?;

        Ok(result.deleted_count > 0)
    }

    /// Run an aggregation pipeline and decode each output row
    pub async fn aggregate<R>(&self, pipeline: Vec<Document>) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
    {
        let cursor = self
            .inner
            .aggregate(pipeline)
            .await
            .map_err(|e| EduHubError::from_driver("Aggregate failed", e))?;

        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| EduHubError::from_driver("Reading aggregate results failed", e))?;

        debug!("Aggregate on '{}' returned {} rows", self.name(), documents.len());

        documents
            .into_iter()
            .map(|d| bson::from_document::<R>(d).map_err(EduHubError::from))
            .collect()
    }

    /// Drop the collection and its indexes
    pub async fn drop(&self) -> Result<()> {
        self.inner
            .drop()
            .await
            .map_err(|e| EduHubError::from_driver("Drop failed", e))
    }

    /// Names of the indexes currently present on the collection
    pub async fn index_names(&self) -> Result<Vec<String>> {
        self.inner
            .list_index_names()
            .await
            .map_err(|e| EduHubError::from_driver("Listing indexes failed", e))
    }

    /// Get the underlying collection for advanced operations
    pub fn inner(&self) -> &Collection<T> {
        &self.inner
    }
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    /// Apply schema-defined indexes.
    ///
    /// Re-applying an index with the same keys and options is accepted by
    /// the server as a no-op.
    pub async fn apply_indexes(&self) -> Result<usize> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(0);
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();
        let count = indices.len();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| EduHubError::from_driver("Failed to create indexes", e))?;

        Ok(count)
    }
}
