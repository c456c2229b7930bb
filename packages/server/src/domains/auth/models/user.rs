use serde::{Deserialize, Serialize};

use crate::common::collections::USERS;
use crate::kernel::{from_document, to_document, BaseDocumentStore, StoreResult};

/// Staff account. Keyed by email; never updated or deleted by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub password_hash: String,
    /// Base32-encoded TOTP secret
    pub totp_secret: String,
}

// =============================================================================
// Store access - ALL document reads/writes for users live here
// =============================================================================

impl User {
    pub async fn find_by_email(
        email: &str,
        store: &dyn BaseDocumentStore,
    ) -> StoreResult<Option<Self>> {
        store
            .get(USERS, email)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Persist a new user. Returns `false` if the email is already registered.
    pub async fn insert(&self, store: &dyn BaseDocumentStore) -> StoreResult<bool> {
        store.create(USERS, &self.email, to_document(self)?).await
    }
}
