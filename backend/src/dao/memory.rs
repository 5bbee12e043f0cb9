//! In-memory document store for tests and database-less runs

use super::{DaoError, DaoResult, DocumentStore, StoredDocument};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

type Key = (String, Uuid);

#[derive(Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<Key, StoredDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key(collection: &str, id: Uuid) -> Key {
    (collection.to_string(), id)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, id: Uuid, body: Value) -> DaoResult<StoredDocument> {
        let mut documents = self.documents.write().await;
        let key = key(collection, id);
        if documents.contains_key(&key) {
            return Err(DaoError::AlreadyExists {
                collection: collection.to_string(),
                id,
            });
        }

        let document = StoredDocument {
            id,
            version: 1,
            body,
        };
        documents.insert(key, document.clone());
        Ok(document)
    }

    async fn find_all(&self, collection: &str) -> DaoResult<Vec<StoredDocument>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn find_one(&self, collection: &str, id: Uuid) -> DaoResult<Option<StoredDocument>> {
        Ok(self.documents.read().await.get(&key(collection, id)).cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> DaoResult<Vec<StoredDocument>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|((c, _), doc)| c == collection && doc.body.get(field) == Some(value))
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        expected_version: i64,
        body: Value,
    ) -> DaoResult<StoredDocument> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(&key(collection, id))
            .ok_or_else(|| DaoError::NotFound {
                collection: collection.to_string(),
                id,
            })?;

        if document.version != expected_version {
            return Err(DaoError::VersionConflict {
                collection: collection.to_string(),
                id,
                expected: expected_version,
                actual: document.version,
            });
        }

        document.version += 1;
        document.body = body;
        Ok(document.clone())
    }

    async fn delete(&self, collection: &str, id: Uuid) -> DaoResult<bool> {
        Ok(self
            .documents
            .write()
            .await
            .remove(&key(collection, id))
            .is_some())
    }

    async fn ping(&self) -> DaoResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let store = InMemoryDocumentStore::new();
        let id = Uuid::new_v4();
        store.create("users", id, json!({})).await.unwrap();
        let err = store.create("users", id, json!({})).await.unwrap_err();
        assert!(matches!(err, DaoError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let store = InMemoryDocumentStore::new();
        let id = Uuid::new_v4();
        store.create("users", id, json!({"n": 1})).await.unwrap();
        store.create("other", id, json!({"n": 2})).await.unwrap();

        assert_eq!(store.find_all("users").await.unwrap().len(), 1);
        let other = store.find_one("other", id).await.unwrap().unwrap();
        assert_eq!(other.body["n"], 2);
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .update("users", Uuid::new_v4(), 1, json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DaoError::NotFound { .. }));
    }

    proptest::proptest! {
        #[test]
        fn prop_versions_count_successful_writes(stale in proptest::collection::vec(proptest::bool::ANY, 1..20)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let store = InMemoryDocumentStore::new();
                let id = Uuid::new_v4();
                let mut version = store.create("users", id, json!({ "n": 0 })).await.unwrap().version;
                let mut writes = 0;

                for (n, use_stale) in stale.into_iter().enumerate() {
                    let expected = if use_stale { version - 1 } else { version };
                    match store.update("users", id, expected, json!({ "n": n })).await {
                        Ok(doc) => {
                            proptest::prop_assert!(!use_stale);
                            version = doc.version;
                            writes += 1;
                        }
                        Err(DaoError::VersionConflict { actual, .. }) => {
                            proptest::prop_assert!(use_stale);
                            proptest::prop_assert_eq!(actual, version);
                        }
                        Err(e) => proptest::prop_assert!(false, "unexpected error: {}", e),
                    }
                }

                proptest::prop_assert_eq!(version, 1 + writes);
                Ok(())
            })?;
        }
    }
}
