use bcrypt::{hash, DEFAULT_COST};
use mongodb::bson::doc;

use crate::database::{self, DocumentStore, StoreError, ADMINS};
use crate::models::{Admin, ADMIN_ROLE, DEFAULT_ADMIN_USERNAME};
use crate::utils::AppError;

const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Garante que existe o admin padrão (admin/admin).
/// Best-effort: falhas são logadas e nunca interrompem o startup.
pub async fn ensure_default_admin(store: &dyn DocumentStore) {
    match seed_default_admin(store, DEFAULT_COST).await {
        Ok(true) => log::info!("👤 Default admin '{}' created", DEFAULT_ADMIN_USERNAME),
        Ok(false) => log::info!("👤 Default admin '{}' already present, skipping seed", DEFAULT_ADMIN_USERNAME),
        Err(e) => log::warn!("⚠️  Could not seed default admin: {}", e),
    }
}

/// Returns `true` when a new admin record was inserted.
async fn seed_default_admin(store: &dyn DocumentStore, cost: u32) -> Result<bool, AppError> {
    let existing: Option<Admin> =
        database::find_record(store, ADMINS, doc! { "username": DEFAULT_ADMIN_USERNAME }).await?;
    if existing.is_some() {
        return Ok(false);
    }

    let admin = Admin {
        id: None,
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        password_hash: hash(DEFAULT_ADMIN_PASSWORD, cost)?,
        role: ADMIN_ROLE.to_string(),
        is_active: true,
    };

    match database::insert_record(store, ADMINS, &admin).await {
        Ok(_) => Ok(true),
        // Another instance won the race; the unique index on username rejected us
        Err(StoreError::DuplicateKey(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::services::auth_service::verify_password;
    use async_trait::async_trait;
    use mongodb::bson::{oid::ObjectId, Document};

    /// Another instance inserts its admin between our lookup and our insert.
    struct RacingStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl DocumentStore for RacingStore {
        async fn insert_one(&self, collection: &str, document: Document) -> Result<ObjectId, StoreError> {
            self.inner.insert_one(collection, document).await
        }

        async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, StoreError> {
            let found = self.inner.find_one(collection, filter).await?;
            self.inner
                .insert_one(ADMINS, doc! { "username": "admin", "password_hash": "theirs", "role": "admin" })
                .await?;
            Ok(found)
        }

        async fn find_many(&self, collection: &str, filter: Document, limit: i64) -> Result<Vec<Document>, StoreError> {
            self.inner.find_many(collection, filter, limit).await
        }

        async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
            self.inner.list_collection_names().await
        }
    }

    #[tokio::test]
    async fn seeding_twice_creates_a_single_admin() {
        let store = MemoryStore::new();

        assert!(seed_default_admin(&store, 4).await.unwrap());
        assert!(!seed_default_admin(&store, 4).await.unwrap());

        assert_eq!(store.count(ADMINS, &doc! { "username": "admin" }), 1);
    }

    #[tokio::test]
    async fn seeded_admin_accepts_default_password_and_stores_a_hash() {
        let store = MemoryStore::new();
        seed_default_admin(&store, 4).await.unwrap();

        let admin: Admin = database::find_record(&store, ADMINS, doc! { "username": "admin" })
            .await
            .unwrap()
            .unwrap();
        assert_ne!(admin.password_hash, "admin");
        assert!(verify_password("admin", &admin.password_hash));
        assert_eq!(admin.role, "admin");
        assert!(admin.is_active);
    }

    #[tokio::test]
    async fn existing_admin_is_left_untouched() {
        let store = MemoryStore::new();
        store
            .insert_one(ADMINS, doc! { "username": "admin", "password_hash": "custom", "role": "admin", "is_active": true })
            .await
            .unwrap();

        ensure_default_admin(&store).await;

        let admin: Admin = database::find_record(&store, ADMINS, doc! { "username": "admin" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.password_hash, "custom");
        assert_eq!(store.count(ADMINS, &doc! {}), 1);
    }

    #[tokio::test]
    async fn losing_the_insert_race_counts_as_already_present() {
        let inner = MemoryStore::new().with_unique_index(ADMINS, "username");
        let store = RacingStore { inner: inner.clone() };

        assert!(!seed_default_admin(&store, 4).await.unwrap());

        let admin: Admin = database::find_record(&inner, ADMINS, doc! { "username": "admin" })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.password_hash, "theirs");
        assert_eq!(inner.count(ADMINS, &doc! {}), 1);
    }

    #[tokio::test]
    async fn unreachable_store_does_not_panic() {
        let store = MemoryStore::unreachable();
        assert!(seed_default_admin(&store, 4).await.is_err());
        ensure_default_admin(&store).await;
    }
}
