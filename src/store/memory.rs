/**
 * In-Memory Credential Store
 *
 * `CredentialStore` backend holding users in a mutex-guarded map, keyed by
 * lowercased email. Used by the test suite and for local development
 * without a database; it enforces the same uniqueness and password-policy
 * semantics as the PostgreSQL backend.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::store::{
    hash_password, validate_password, Address, CredentialStore, NewUser, StoreError, User,
};

/// In-memory credential store
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    // Keyed by lowercased email, mirroring the unique index on
    // lower(email) in the PostgreSQL schema.
    users: Arc<Mutex<HashMap<String, User>>>,
}

impl MemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, User>> {
        // A poisoned lock only means another thread panicked mid-write;
        // the map itself is still usable.
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.lock();
        Ok(users.get(&email.to_lowercase()).map(|user| {
            let mut user = user.clone();
            user.address = None;
            user
        }))
    }

    async fn find_by_email_with_address(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.lock();
        Ok(users.get(&email.to_lowercase()).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let policy_errors = validate_password(&new_user.password);
        if !policy_errors.is_empty() {
            return Err(StoreError::Validation(policy_errors));
        }

        let password_hash = hash_password(&new_user.password)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.clone(),
            display_name: new_user.display_name,
            password_hash,
            address: None,
            created_at: now,
            updated_at: now,
        };

        let mut users = self.lock();
        let key = new_user.email.to_lowercase();
        if users.contains_key(&key) {
            return Err(StoreError::DuplicateEmail);
        }
        users.insert(key, user.clone());

        Ok(user)
    }

    async fn update_address(&self, user_id: Uuid, address: Address) -> Result<Address, StoreError> {
        let mut users = self.lock();
        let user = users
            .values_mut()
            .find(|user| user.id == user_id)
            .ok_or(sqlx::Error::RowNotFound)?;

        user.address = Some(address.clone());
        user.updated_at = Utc::now();

        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> NewUser {
        NewUser {
            display_name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Secret123!".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = MemoryCredentialStore::new();
        let created = store.create(alice()).await.unwrap();

        let found = store.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, created.id);
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_insensitive() {
        let store = MemoryCredentialStore::new();
        store.create(alice()).await.unwrap();

        let found = store.find_by_email("ALICE@Example.COM").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryCredentialStore::new();
        store.create(alice()).await.unwrap();

        let mut dup = alice();
        dup.email = "Alice@Example.com".to_string();
        let result = store.create(dup).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_password_policy_enforced() {
        let store = MemoryCredentialStore::new();
        let mut weak = alice();
        weak.password = "weak".to_string();

        let result = store.create(weak).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_verify_password() {
        let store = MemoryCredentialStore::new();
        let user = store.create(alice()).await.unwrap();

        assert!(store.verify_password(&user, "Secret123!"));
        assert!(!store.verify_password(&user, "wrong"));
    }

    #[tokio::test]
    async fn test_address_upsert() {
        let store = MemoryCredentialStore::new();
        let user = store.create(alice()).await.unwrap();

        let address = Address {
            line1: "1 Main St".to_string(),
            line2: None,
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            country: "US".to_string(),
        };
        store.update_address(user.id, address.clone()).await.unwrap();

        let loaded = store
            .find_by_email_with_address("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.address, Some(address.clone()));

        // find_by_email does not eager-load the address
        let plain = store.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert!(plain.address.is_none());

        // Second write replaces the whole record (last-writer-wins)
        let mut second = address;
        second.city = "Shelbyville".to_string();
        store.update_address(user.id, second.clone()).await.unwrap();
        let loaded = store
            .find_by_email_with_address("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.address.unwrap().city, "Shelbyville");
    }
}
