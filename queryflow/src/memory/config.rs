//! Where state snapshots live: a SQLite file under a directory, or process memory.

use std::path::PathBuf;
use std::sync::Arc;

use super::document_store::{DocumentStore, StoreError};
use super::in_memory_store::InMemoryDocumentStore;
use super::sqlite_store::SqliteDocumentStore;

/// Default collection name for workflow state snapshots.
pub const DEFAULT_COLLECTION: &str = "agent_workflow_states";

/// File created inside the persist directory.
pub const STORE_FILE_NAME: &str = "states.sqlite3";

/// Persistence settings.
///
/// `persist_directory: None` keeps snapshots in memory for the life of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceConfig {
    pub persist_directory: Option<PathBuf>,
    pub collection_name: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            persist_directory: None,
            collection_name: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl PersistenceConfig {
    /// Opens the store: creates the directory and its SQLite file when a directory is set.
    pub fn open_document_store(&self) -> Result<Arc<dyn DocumentStore>, StoreError> {
        match &self.persist_directory {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|e| {
                    StoreError::Storage(format!("create {}: {}", dir.display(), e))
                })?;
                let path = dir.join(STORE_FILE_NAME);
                tracing::info!(path = %path.display(), collection = %self.collection_name, "opening persistent state store");
                Ok(Arc::new(SqliteDocumentStore::new(path, self.collection_name.clone())?))
            }
            None => {
                tracing::info!(collection = %self.collection_name, "using in-memory state store");
                Ok(Arc::new(InMemoryDocumentStore::new()))
            }
        }
    }
}
