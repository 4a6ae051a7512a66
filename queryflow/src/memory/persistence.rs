//! State persistence over a document store.
//!
//! Each save adds a new document `{state_id}_{uuid4}` whose metadata always carries
//! `state_id`. Loading returns the first document matching `state_id`; which one is not
//! guaranteed when several snapshots exist for the same id. Deleting removes up to
//! [`DELETE_LOOKUP_LIMIT`] matching documents per call.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::document_store::{DocumentStore, Metadata, StoreError};
use super::serializer::{JsonSerializer, Serializer};

/// Metadata key that tags every snapshot with its state id.
pub const STATE_ID_KEY: &str = "state_id";

/// Max documents looked up (and so deleted) by one `delete_state` call.
pub const DELETE_LOOKUP_LIMIT: usize = 100;

/// Saves, loads and deletes workflow state snapshots by state id.
///
/// **Interaction**: Held by [`AgentWorkflow`](crate::workflow::AgentWorkflow) as
/// `Arc<dyn StatePersistence<AgentState>>`.
#[async_trait]
pub trait StatePersistence<S>: Send + Sync {
    /// Adds a new snapshot. `metadata` is merged with `{"state_id": state_id}`.
    async fn save_state(
        &self,
        state_id: &str,
        state: &S,
        metadata: Option<Metadata>,
    ) -> Result<(), StoreError>;

    /// First snapshot found for `state_id`, or `None`.
    async fn load_state(&self, state_id: &str) -> Result<Option<S>, StoreError>;

    /// Removes snapshots for `state_id`. No-op when there are none.
    async fn delete_state(&self, state_id: &str) -> Result<(), StoreError>;
}

/// [`StatePersistence`] backed by any [`DocumentStore`].
pub struct DocumentStatePersistence<S, Z = JsonSerializer> {
    store: Arc<dyn DocumentStore>,
    serializer: Z,
    _state: PhantomData<fn() -> S>,
}

impl<S> DocumentStatePersistence<S, JsonSerializer> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_serializer(store, JsonSerializer)
    }
}

impl<S, Z> DocumentStatePersistence<S, Z> {
    pub fn with_serializer(store: Arc<dyn DocumentStore>, serializer: Z) -> Self {
        Self {
            store,
            serializer,
            _state: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

fn state_filter(state_id: &str) -> Metadata {
    let mut filter = Metadata::new();
    filter.insert(STATE_ID_KEY.into(), Value::String(state_id.to_string()));
    filter
}

#[async_trait]
impl<S, Z> StatePersistence<S> for DocumentStatePersistence<S, Z>
where
    S: Send + Sync + 'static,
    Z: Serializer<S> + 'static,
{
    async fn save_state(
        &self,
        state_id: &str,
        state: &S,
        metadata: Option<Metadata>,
    ) -> Result<(), StoreError> {
        let document = self.serializer.serialize(state)?;
        let mut metadata = metadata.unwrap_or_default();
        metadata.insert(STATE_ID_KEY.into(), Value::String(state_id.to_string()));
        let id = format!("{}_{}", state_id, uuid::Uuid::new_v4());
        self.store.add(&id, &document, &metadata).await?;
        tracing::debug!(state_id, doc_id = %id, "state saved");
        Ok(())
    }

    async fn load_state(&self, state_id: &str) -> Result<Option<S>, StoreError> {
        let hits = self.store.query(&state_filter(state_id), 1).await?;
        match hits.first() {
            Some(doc) => Ok(Some(self.serializer.deserialize(&doc.document)?)),
            None => Ok(None),
        }
    }

    async fn delete_state(&self, state_id: &str) -> Result<(), StoreError> {
        let hits = self
            .store
            .query(&state_filter(state_id), DELETE_LOOKUP_LIMIT)
            .await?;
        if hits.is_empty() {
            return Ok(());
        }
        let ids: Vec<String> = hits.into_iter().map(|d| d.id).collect();
        tracing::debug!(state_id, count = ids.len(), "deleting state snapshots");
        self.store.delete(&ids).await
    }
}
