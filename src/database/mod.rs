use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[cfg(test)]
pub mod memory;

pub const CUSTOMERS: &str = "customer";
pub const ADMINS: &str = "admin";
pub const LEADS: &str = "lead";
pub const FEEDBACK: &str = "feedback";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    #[error("Failed to decode document: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    #[error("Store returned a non-ObjectId identifier: {0}")]
    UnexpectedId(Bson),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A unique index rejected the write.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
}

/// Minimal collection access needed by the services.
///
/// Filters are plain equality documents (`{"field": value, ...}`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts `document` and returns the identifier the store assigned to it.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<ObjectId, StoreError>;

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, StoreError>;

    /// Returns at most `limit` matching documents in store-default order.
    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError>;

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError>;
}

pub async fn insert_record<T: Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: &str,
    record: &T,
) -> Result<ObjectId, StoreError> {
    let document = mongodb::bson::to_document(record)?;
    store.insert_one(collection, document).await
}

pub async fn find_record<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    filter: Document,
) -> Result<Option<T>, StoreError> {
    match store.find_one(collection, filter).await? {
        Some(document) => Ok(Some(mongodb::bson::from_document(document)?)),
        None => Ok(None),
    }
}

pub async fn find_records<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &str,
    filter: Document,
    limit: i64,
) -> Result<Vec<T>, StoreError> {
    store
        .find_many(collection, filter, limit)
        .await?
        .into_iter()
        .map(|document| mongodb::bson::from_document(document).map_err(StoreError::from))
        .collect()
}

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, database_name: &str) -> Result<Self, StoreError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));
        client_options.app_name = Some("agency-leads-api".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(database_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Extracts the database name from the URI path, e.g. `mongodb://host/leads?x=y` -> `leads`.
    pub fn database_name_from_uri(uri: &str) -> Option<String> {
        let rest = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
        let (_, path) = rest.split_once('/')?;
        let name = path.split('?').next().unwrap_or_default();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// Creates the lookup and uniqueness indexes the handlers rely on.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let indexes = [
            (CUSTOMERS, doc! { "email": 1 }, true),
            (ADMINS, doc! { "username": 1 }, true),
            (LEADS, doc! { "customer_id": 1 }, false),
            (FEEDBACK, doc! { "lead_id": 1, "customer_id": 1 }, false),
        ];

        for (collection, keys, unique) in indexes {
            let description = format!("{}({})", collection, keys.keys().cloned().collect::<Vec<_>>().join(", "));
            let model = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(unique).build())
                .build();

            match self.db.collection::<Document>(collection).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index ready: {}", description),
                Err(e) => log::warn!("   ⚠️  Could not create index {}: {}", description, e),
            }
        }
    }
}

/// Server error 11000, raised by the unique indexes from `ensure_indexes`.
fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

#[async_trait]
impl DocumentStore for MongoDB {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<ObjectId, StoreError> {
        let result = match self.db.collection::<Document>(collection).insert_one(document).await {
            Ok(result) => result,
            Err(e) if is_duplicate_key(&e) => return Err(StoreError::DuplicateKey(e.to_string())),
            Err(e) => return Err(e.into()),
        };
        match result.inserted_id {
            Bson::ObjectId(id) => Ok(id),
            other => Err(StoreError::UnexpectedId(other)),
        }
    }

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, StoreError> {
        Ok(self.db.collection::<Document>(collection).find_one(filter).await?)
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(filter)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.db.list_collection_names().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_name_is_taken_from_uri_path() {
        assert_eq!(
            MongoDB::database_name_from_uri("mongodb://localhost:27017/leads?retryWrites=true"),
            Some("leads".to_string())
        );
        assert_eq!(
            MongoDB::database_name_from_uri("mongodb+srv://user:pw@cluster.example.net/agency"),
            Some("agency".to_string())
        );
    }

    #[test]
    fn database_name_is_none_without_path() {
        assert_eq!(MongoDB::database_name_from_uri("mongodb://localhost:27017"), None);
        assert_eq!(MongoDB::database_name_from_uri("mongodb://localhost:27017/"), None);
        assert_eq!(MongoDB::database_name_from_uri("mongodb://localhost:27017/?tls=true"), None);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let store = MongoDB::new(&uri, "agency_leads_test").await;
        assert!(store.is_ok());
    }
}
