//! # Memory: workflow state persistence
//!
//! Snapshots of workflow state are stored as JSON documents tagged with metadata.
//!
//! ## Layers
//!
//! 1. [`DocumentStore`]: add / query-by-metadata / delete over text documents.
//! 2. [`StatePersistence`]: save / load / delete state by `state_id`, implemented by
//!    [`DocumentStatePersistence`] on top of any document store.
//!
//! ## Store Implementations
//!
//! | Type                      | Persistence | Use case            |
//! |---------------------------|-------------|---------------------|
//! | [`InMemoryDocumentStore`] | In-memory   | Dev, tests          |
//! | [`SqliteDocumentStore`]   | SQLite file | Single-node service |
//!
//! [`PersistenceConfig::open_document_store`] picks one from configuration.

mod config;
mod document_store;
mod in_memory_store;
mod persistence;
mod serializer;
mod sqlite_store;

pub use config::{PersistenceConfig, DEFAULT_COLLECTION, STORE_FILE_NAME};
pub use document_store::{Document, DocumentStore, Metadata, StoreError};
pub use in_memory_store::InMemoryDocumentStore;
pub use persistence::{DocumentStatePersistence, StatePersistence, DELETE_LOOKUP_LIMIT, STATE_ID_KEY};
pub use serializer::{JsonSerializer, Serializer};
pub use sqlite_store::SqliteDocumentStore;
