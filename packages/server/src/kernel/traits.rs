// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (code allocation, cascades) lives in domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseDocumentStore)

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A stored document body. Always a JSON object.
pub type Document = Map<String, Value>;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by document store implementations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {collection}/{key}")]
    NotFound { collection: String, key: String },

    #[error("Document is not a JSON object")]
    NotAnObject,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Document Store Trait (Infrastructure)
// =============================================================================

/// Collection/document API over a remote document database.
///
/// Documents are addressed by `(collection, key)`. Listing and queries return
/// `(key, document)` pairs ordered by key.
#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Fetch a single document
    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Document>>;

    /// Create or overwrite a document
    async fn set(&self, collection: &str, key: &str, document: Document) -> StoreResult<()>;

    /// Insert a document only if the key is free.
    ///
    /// Returns `false` without writing when the key is already taken.
    async fn create(&self, collection: &str, key: &str, document: Document) -> StoreResult<bool>;

    /// Merge top-level fields into an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist.
    async fn update(&self, collection: &str, key: &str, patch: Document) -> StoreResult<()>;

    /// Delete a document. Deleting an absent key is not an error.
    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()>;

    /// All documents of a collection
    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Document)>>;

    /// Documents whose `field` equals `value`. A missing field never matches.
    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(String, Document)>>;

    async fn exists(&self, collection: &str, key: &str) -> StoreResult<bool> {
        Ok(self.get(collection, key).await?.is_some())
    }
}

/// Serialize a model into a document body
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

/// Deserialize a document body into a model
pub fn from_document<T: DeserializeOwned>(document: Document) -> StoreResult<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}
