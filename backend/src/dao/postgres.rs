//! PostgreSQL document store
//!
//! All collections share the `documents` table; bodies are JSONB.

use super::{DaoError, DaoResult, DocumentStore, StoredDocument};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

/// Document row from database
#[derive(Debug, sqlx::FromRow)]
struct DocumentRecord {
    id: Uuid,
    version: i64,
    body: Value,
}

impl From<DocumentRecord> for StoredDocument {
    fn from(record: DocumentRecord) -> Self {
        Self {
            id: record.id,
            version: record.version,
            body: record.body,
        }
    }
}

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create(&self, collection: &str, id: Uuid, body: Value) -> DaoResult<StoredDocument> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            r#"
            INSERT INTO documents (collection, id, version, body)
            VALUES ($1, $2, 1, $3)
            RETURNING id, version, body
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(&body)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => DaoError::AlreadyExists {
                collection: collection.to_string(),
                id,
            },
            other => DaoError::Database(other),
        })?;

        Ok(record.into())
    }

    async fn find_all(&self, collection: &str) -> DaoResult<Vec<StoredDocument>> {
        let records = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT id, version, body
            FROM documents
            WHERE collection = $1
            ORDER BY created_at
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn find_one(&self, collection: &str, id: Uuid) -> DaoResult<Option<StoredDocument>> {
        let record = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT id, version, body
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> DaoResult<Vec<StoredDocument>> {
        let records = sqlx::query_as::<_, DocumentRecord>(
            r#"
            SELECT id, version, body
            FROM documents
            WHERE collection = $1 AND body -> $2 = $3
            ORDER BY created_at
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        expected_version: i64,
        body: Value,
    ) -> DaoResult<StoredDocument> {
        let updated = sqlx::query_as::<_, DocumentRecord>(
            r#"
            UPDATE documents
            SET body = $4, version = version + 1, updated_at = NOW()
            WHERE collection = $1 AND id = $2 AND version = $3
            RETURNING id, version, body
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(expected_version)
        .bind(&body)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(record) = updated {
            return Ok(record.into());
        }

        // Nothing matched: either the document is gone or the version moved on
        let current: Option<i64> = sqlx::query_scalar(
            "SELECT version FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Err(match current {
            Some(actual) => DaoError::VersionConflict {
                collection: collection.to_string(),
                id,
                expected: expected_version,
                actual,
            },
            None => DaoError::NotFound {
                collection: collection.to_string(),
                id,
            },
        })
    }

    async fn delete(&self, collection: &str, id: Uuid) -> DaoResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> DaoResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
