//! In-memory user store for exercising the HTTP layer without `MongoDB`.

use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use user_service_core::{User, UserFields, UserId};

use super::{OPERATION_TIMEOUT, RepositoryError, UserStore};

/// User store backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<UserId, UserFields>>,
    unavailable: bool,
}

impl MemoryUserStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every operation times out.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            users: RwLock::default(),
            unavailable: true,
        }
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    const fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::Timeout(OPERATION_TIMEOUT));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: UserId) -> Result<User, RepositoryError> {
        self.check_available()?;
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .map(|fields| User::new(id, fields))
            .ok_or(RepositoryError::NotFound)
    }

    async fn insert(&self, record: UserFields) -> Result<User, RepositoryError> {
        self.check_available()?;
        let id = UserId::from(ObjectId::new());
        self.users.write().await.insert(id, record.clone());
        Ok(User::new(id, record))
    }

    async fn delete_by_id(&self, id: UserId) -> Result<(), RepositoryError> {
        self.check_available()?;
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ada() -> UserFields {
        UserFields::from_json_slice(br#"{"name":"Ada"}"#).unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let store = MemoryUserStore::new();
        let first = store.insert(ada()).await.unwrap();
        let second = store.insert(ada()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_after_insert() {
        let store = MemoryUserStore::new();
        let created = store.insert(ada()).await.unwrap();

        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, created);
        assert_eq!(found.fields.get("name"), Some(&json!("Ada")));
    }

    #[tokio::test]
    async fn test_delete_then_find_is_not_found() {
        let store = MemoryUserStore::new();
        let created = store.insert(ada()).await.unwrap();

        store.delete_by_id(created.id).await.unwrap();

        assert!(matches!(
            store.find_by_id(created.id).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.delete_by_id(created.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_unavailable_store_times_out() {
        let store = MemoryUserStore::unavailable();
        assert!(matches!(
            store.insert(ada()).await,
            Err(RepositoryError::Timeout(_))
        ));
        assert!(store.ping().await.is_err());
    }
}
