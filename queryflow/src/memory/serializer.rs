//! Serializer for persisted state (state <-> document text).
//!
//! Used by [`DocumentStatePersistence`](super::DocumentStatePersistence); document stores
//! hold text blobs, so state is written as a JSON string.

use crate::memory::document_store::StoreError;

/// Serializes and deserializes state for document storage.
pub trait Serializer<S>: Send + Sync {
    fn serialize(&self, state: &S) -> Result<String, StoreError>;
    fn deserialize(&self, document: &str) -> Result<S, StoreError>;
}

/// JSON-based serializer. Requires S: Serialize + serde::de::DeserializeOwned.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl<S> Serializer<S> for JsonSerializer
where
    S: serde::Serialize + serde::de::DeserializeOwned,
{
    fn serialize(&self, state: &S) -> Result<String, StoreError> {
        serde_json::to_string(state).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn deserialize(&self, document: &str) -> Result<S, StoreError> {
        serde_json::from_str(document).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
