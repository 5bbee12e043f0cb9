//! Document storage
//!
//! Users are stored as whole JSON documents (training plans, friends and
//! push subscriptions nested inside). Every document carries a version
//! counter; an update names the version it was read at and fails with
//! [`DaoError::VersionConflict`] when someone else wrote in between.

mod memory;
mod postgres;

pub use memory::InMemoryDocumentStore;
pub use postgres::PgDocumentStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Storage errors
#[derive(Error, Debug)]
pub enum DaoError {
    #[error("{collection} document {id} not found")]
    NotFound { collection: String, id: Uuid },

    #[error("{collection} document {id} was modified concurrently (expected version {expected}, found {actual})")]
    VersionConflict {
        collection: String,
        id: Uuid,
        expected: i64,
        actual: i64,
    },

    #[error("{collection} document {id} already exists")]
    AlreadyExists { collection: String, id: Uuid },

    #[error("Document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type DaoResult<T> = Result<T, DaoError>;

/// A raw stored document
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub version: i64,
    pub body: Value,
}

/// Backend-agnostic JSON document store
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document at version 1
    async fn create(&self, collection: &str, id: Uuid, body: Value) -> DaoResult<StoredDocument>;

    async fn find_all(&self, collection: &str) -> DaoResult<Vec<StoredDocument>>;

    async fn find_one(&self, collection: &str, id: Uuid) -> DaoResult<Option<StoredDocument>>;

    /// Documents whose top-level `field` equals `value`
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> DaoResult<Vec<StoredDocument>>;

    /// Replace the body if the stored version is still `expected_version`
    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        expected_version: i64,
        body: Value,
    ) -> DaoResult<StoredDocument>;

    /// Returns whether a document was removed
    async fn delete(&self, collection: &str, id: Uuid) -> DaoResult<bool>;

    /// Connectivity check for readiness probes
    async fn ping(&self) -> DaoResult<()>;
}

/// A type persisted as one document
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;
}

/// A decoded document together with the version it was read at
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub version: i64,
    pub value: T,
}

impl<T> Versioned<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Versioned<U> {
        Versioned {
            version: self.version,
            value: f(self.value),
        }
    }
}

/// Typed access to one collection
pub struct GenericDao<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for GenericDao<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> GenericDao<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    fn decode(document: StoredDocument) -> DaoResult<Versioned<T>> {
        Ok(Versioned {
            version: document.version,
            value: serde_json::from_value(document.body)?,
        })
    }

    pub async fn create(&self, value: &T) -> DaoResult<Versioned<T>> {
        let body = serde_json::to_value(value)?;
        let stored = self.store.create(T::COLLECTION, value.id(), body).await?;
        Self::decode(stored)
    }

    pub async fn find_all(&self) -> DaoResult<Vec<Versioned<T>>> {
        self.store
            .find_all(T::COLLECTION)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    pub async fn find_one(&self, id: Uuid) -> DaoResult<Option<Versioned<T>>> {
        self.store
            .find_one(T::COLLECTION, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Like [`find_one`](Self::find_one) but a missing document is an error
    pub async fn get(&self, id: Uuid) -> DaoResult<Versioned<T>> {
        self.find_one(id).await?.ok_or_else(|| DaoError::NotFound {
            collection: T::COLLECTION.to_string(),
            id,
        })
    }

    pub async fn find_by_field(&self, field: &str, value: impl Serialize) -> DaoResult<Vec<Versioned<T>>> {
        let value = serde_json::to_value(value)?;
        self.store
            .find_by_field(T::COLLECTION, field, &value)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Write back a document read at `document.version`
    pub async fn update(&self, document: &Versioned<T>) -> DaoResult<Versioned<T>> {
        let body = serde_json::to_value(&document.value)?;
        let stored = self
            .store
            .update(T::COLLECTION, document.value.id(), document.version, body)
            .await?;
        Self::decode(stored)
    }

    pub async fn delete(&self, id: Uuid) -> DaoResult<bool> {
        self.store.delete(T::COLLECTION, id).await
    }
}
