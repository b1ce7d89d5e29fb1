use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Bson, Document};

use super::{DocumentStore, StoreError};

/// In-process [`DocumentStore`] with equality-filter semantics, for tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Vec<Document>>>>,
    /// (collection, field) pairs enforced like MongoDB unique indexes.
    unique: Vec<(String, String)>,
    unreachable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, like a MongoDB that went away.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Rejects inserts that repeat `field` within `collection`.
    pub fn with_unique_index(mut self, collection: &str, field: &str) -> Self {
        self.unique.push((collection.to_string(), field.to_string()));
        self
    }

    pub fn count(&self, collection: &str, filter: &Document) -> usize {
        let collections = self.collections.lock().unwrap();
        collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matches(d, filter)).count())
            .unwrap_or(0)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unreachable {
            Err(StoreError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<ObjectId, StoreError> {
        self.check()?;
        let id = match document.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            Some(other) => return Err(StoreError::UnexpectedId(other.clone())),
            None => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };
        let mut collections = self.collections.lock().unwrap();
        let documents = collections.entry(collection.to_string()).or_default();

        for (_, field) in self.unique.iter().filter(|(c, _)| c == collection) {
            if let Some(value) = document.get(field) {
                if documents.iter().any(|d| d.get(field) == Some(value)) {
                    return Err(StoreError::DuplicateKey(format!("{}.{} = {}", collection, field, value)));
                }
            }
        }

        documents.push(document);
        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, StoreError> {
        self.check()?;
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError> {
        self.check()?;
        let limit = if limit > 0 { limit as usize } else { usize::MAX };
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| matches(d, &filter))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        self.check()?;
        let mut names: Vec<String> = self.collections.lock().unwrap().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn insert_assigns_id_and_find_matches_on_every_filter_field() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("lead", doc! { "customer_id": "a", "name": "Jane" })
            .await
            .unwrap();
        store
            .insert_one("lead", doc! { "customer_id": "b", "name": "Jane" })
            .await
            .unwrap();

        let found = store
            .find_one("lead", doc! { "_id": id, "customer_id": "a" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_str("name").unwrap(), "Jane");

        let miss = store
            .find_one("lead", doc! { "_id": id, "customer_id": "b" })
            .await
            .unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn find_many_respects_limit() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store.insert_one("lead", doc! { "customer_id": "a", "n": i }).await.unwrap();
        }
        let docs = store.find_many("lead", doc! { "customer_id": "a" }, 3).await.unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(store.count("lead", &doc! {}), 5);
    }

    #[tokio::test]
    async fn unique_index_rejects_repeated_values() {
        let store = MemoryStore::new().with_unique_index("admin", "username");
        store.insert_one("admin", doc! { "username": "admin" }).await.unwrap();
        store.insert_one("admin", doc! { "username": "ops" }).await.unwrap();

        let repeated = store.insert_one("admin", doc! { "username": "admin" }).await;
        assert!(matches!(repeated, Err(StoreError::DuplicateKey(_))));
        assert_eq!(store.count("admin", &doc! {}), 2);
    }

    #[tokio::test]
    async fn unreachable_store_fails_every_operation() {
        let store = MemoryStore::unreachable();
        assert!(store.insert_one("admin", doc! {}).await.is_err());
        assert!(store.find_one("admin", doc! {}).await.is_err());
        assert!(store.list_collection_names().await.is_err());
    }
}
