//! Postgres-backed document store.
//!
//! All collections share the `documents` table (see `migrations/`); document
//! bodies live in a JSONB column and merges use the `||` operator.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};

use super::traits::{BaseDocumentStore, Document, StoreError, StoreResult};

#[derive(Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_document(value: Value) -> StoreResult<Document> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

fn rows_to_documents(rows: Vec<sqlx::postgres::PgRow>) -> StoreResult<Vec<(String, Document)>> {
    rows.into_iter()
        .map(|row| {
            let key: String = row.try_get("key")?;
            let data: Value = row.try_get("data")?;
            Ok((key, into_document(data)?))
        })
        .collect()
}

#[async_trait]
impl BaseDocumentStore for PostgresDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> StoreResult<Option<Document>> {
        let data: Option<Value> =
            sqlx::query_scalar("SELECT data FROM documents WHERE collection = $1 AND key = $2")
                .bind(collection)
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        data.map(into_document).transpose()
    }

    async fn set(&self, collection: &str, key: &str, document: Document) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, key, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, key) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(Value::Object(document))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create(&self, collection: &str, key: &str, document: Document) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO documents (collection, key, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, key) DO NOTHING
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(Value::Object(document))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, collection: &str, key: &str, patch: Document) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET data = data || $3, updated_at = NOW()
            WHERE collection = $1 AND key = $2
            "#,
        )
        .bind(collection)
        .bind(key)
        .bind(Value::Object(patch))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }

        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> StoreResult<()> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND key = $2")
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<(String, Document)>> {
        let rows = sqlx::query("SELECT key, data FROM documents WHERE collection = $1 ORDER BY key")
            .bind(collection)
            .fetch_all(&self.pool)
            .await?;

        rows_to_documents(rows)
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> StoreResult<Vec<(String, Document)>> {
        // Containment never matches a missing field, and uses the GIN index
        let rows = sqlx::query(
            r#"
            SELECT key, data FROM documents
            WHERE collection = $1 AND data @> jsonb_build_object($2::text, $3::jsonb)
            ORDER BY key
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        rows_to_documents(rows)
    }
}
