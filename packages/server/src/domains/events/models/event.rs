use serde::{Deserialize, Serialize};

use crate::common::collections::EVENTS;
use crate::kernel::{from_document, to_document, BaseDocumentStore, Document, StoreResult};

/// Campus event pinned to a map location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub codigo: String,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    #[serde(default)]
    pub description: String,

    // Audit
    pub created_by: String,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

// =============================================================================
// Store access - ALL document reads/writes for events live here
// =============================================================================

impl Event {
    pub async fn find(code: &str, store: &dyn BaseDocumentStore) -> StoreResult<Option<Self>> {
        store
            .get(EVENTS, code)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn list(store: &dyn BaseDocumentStore) -> StoreResult<Vec<Self>> {
        store
            .list(EVENTS)
            .await?
            .into_iter()
            .map(|(_, doc)| from_document(doc))
            .collect()
    }

    /// Create or overwrite the event stored under this code
    pub async fn save(&self, store: &dyn BaseDocumentStore) -> StoreResult<()> {
        store.set(EVENTS, &self.codigo, to_document(self)?).await
    }

    /// Merge `patch` into the stored event and return the result
    pub async fn update(
        code: &str,
        patch: Document,
        store: &dyn BaseDocumentStore,
    ) -> StoreResult<Option<Self>> {
        store.update(EVENTS, code, patch).await?;
        Self::find(code, store).await
    }

    pub async fn delete(code: &str, store: &dyn BaseDocumentStore) -> StoreResult<()> {
        store.delete(EVENTS, code).await
    }
}
