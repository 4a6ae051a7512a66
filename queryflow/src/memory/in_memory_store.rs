use async_trait::async_trait;
use dashmap::DashMap;

use super::document_store::{matches_filter, Document, DocumentStore, Metadata, StoreError};

/// In-memory document store for dev and tests.
///
/// **In-Memory**: All data stored in memory, lost when store is dropped. Query order
/// follows map iteration, not insertion.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    data: DashMap<String, Document>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn add(&self, id: &str, document: &str, metadata: &Metadata) -> Result<(), StoreError> {
        match self.data.entry(id.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::DuplicateId(id.to_string())),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Document {
                    id: id.to_string(),
                    document: document.to_string(),
                    metadata: metadata.clone(),
                });
                Ok(())
            }
        }
    }

    async fn query(&self, filter: &Metadata, limit: usize) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .data
            .iter()
            .filter(|e| matches_filter(&e.value().metadata, filter))
            .take(limit)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> Result<(), StoreError> {
        for id in ids {
            self.data.remove(id);
        }
        Ok(())
    }
}
