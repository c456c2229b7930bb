// TestDependencies - fault-injecting store for testing
//
// Wraps the in-memory store and fails writes to selected documents, so partial
// cascade failures can be exercised without a real database.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    BaseDocumentStore, Document, MemoryDocumentStore, Notifier, ServerDeps, StoreError,
    StoreResult,
};
use crate::domains::auth::{JwtService, PasswordHasher};

pub const TEST_JWT_SECRET: &str = "test-secret";
pub const TEST_JWT_ISSUER: &str = "campus-directory";

/// ServerDeps over `store` with a fixed JWT secret and the cheapest bcrypt cost
pub fn test_server_deps(store: Arc<dyn BaseDocumentStore>) -> ServerDeps {
    ServerDeps::new(
        store,
        Notifier::new(),
        Arc::new(JwtService::new(
            TEST_JWT_SECRET,
            TEST_JWT_ISSUER.to_string(),
            Duration::from_secs(15 * 60),
        )),
        PasswordHasher::new(4),
        "Campus Directory".to_string(),
    )
}

/// Store whose `update` fails for the configured `(collection, key)` pairs.
#[derive(Clone, Default)]
pub struct FailingDocumentStore {
    inner: MemoryDocumentStore,
    failing_updates: Arc<Mutex<HashSet<(String, String)>>>,
}

impl FailingDocumentStore {
    pub fn new(inner: MemoryDocumentStore) -> Self {
        Self {
            inner,
            failing_updates: Arc::default(),
        }
    }

    /// Make every subsequent update of this document fail
    pub fn fail_updates_to(&self, collection: &str, key: &str) {
        self.failing_updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((collection.to_string(), key.to_string()));
    }

    fn should_fail(&self, collection: &str, key: &str) -> bool {
        self.failing_updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(collection.to_string(), key.to_string()))
    }
}

#[async_trait]
impl BaseDocumentStore for FailingDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Document>> {
        self.inner.get(collection, key).await
    }

    async fn set(&self, collection: &str, key: &str, document: Document) -> StoreResult<()> {
        self.inner.set(collection, key, document).await
    }

    async fn create(&self, collection: &str, key: &str, document: Document) -> StoreResult<bool> {
        self.inner.create(collection, key, document).await
    }

    async fn update(&self, collection: &str, key: &str, patch: Document) -> StoreResult<()> {
        if self.should_fail(collection, key) {
            return Err(StoreError::Unavailable(format!(
                "injected failure for {collection}/{key}"
            )));
        }
        self.inner.update(collection, key, patch).await
    }

    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()> {
        self.inner.delete(collection, key).await
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Document)>> {
        self.inner.list(collection).await
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(String, Document)>> {
        self.inner.find_eq(collection, field, value).await
    }
}
