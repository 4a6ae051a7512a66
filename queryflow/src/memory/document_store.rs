//! Document store abstraction: tagged JSON blobs queried by metadata equality.
//!
//! Modeled on a vector database collection used as a plain document store:
//! `add(id, document, metadata)`, `query(filter, limit)`, `delete(ids)`. No similarity
//! search and no ordering guarantee on query results.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Metadata attached to a document; also used as an equality filter.
pub type Metadata = Map<String, Value>;

/// One stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub document: String,
    pub metadata: Metadata,
}

/// Error from a document store or from (de)serializing what it holds.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("document id already exists: {0}")]
    DuplicateId(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}

/// Document store collection.
///
/// **Interaction**: Used as `Arc<dyn DocumentStore>` by
/// [`DocumentStatePersistence`](super::DocumentStatePersistence).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Adds one document. Fails with [`StoreError::DuplicateId`] if `id` exists.
    async fn add(&self, id: &str, document: &str, metadata: &Metadata) -> Result<(), StoreError>;

    /// Returns up to `limit` documents whose metadata contains every key/value in `filter`.
    async fn query(&self, filter: &Metadata, limit: usize) -> Result<Vec<Document>, StoreError>;

    /// Deletes the given ids; unknown ids are ignored.
    async fn delete(&self, ids: &[String]) -> Result<(), StoreError>;
}

/// True when every `filter` entry is present in `metadata` with an equal value.
pub(crate) fn matches_filter(metadata: &Metadata, filter: &Metadata) -> bool {
    filter.iter().all(|(k, v)| metadata.get(k) == Some(v))
}
