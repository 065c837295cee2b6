//! In-memory store implementations.
//!
//! Backing stores for the test suites. Each store guards its map with a
//! single [`RwLock`], so every operation is atomic with respect to the others.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use stockflow_core::AuthError;
use stockflow_models::User;
use tokio::sync::RwLock;

use crate::refresh_tokens::RefreshTokenStore;
use crate::users::UserStore;

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &User) -> Result<User, AuthError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(AuthError::UsernameAlreadyUsed);
        }
        if users.contains_key(&user.id) {
            return Err(AuthError::internal(anyhow::anyhow!(
                "duplicate user id {}",
                user.id
            )));
        }

        let now = Utc::now();
        let stored = User {
            created_at: now,
            updated_at: now,
            ..user.clone()
        };
        users.insert(stored.id.clone(), stored.clone());

        Ok(stored)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, AuthError> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(AuthError::UserNotFound)
    }

    async fn get_by_username(&self, username: &str) -> Result<User, AuthError> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(AuthError::UserNotFound)
    }

    async fn update(&self, user: &User) -> Result<(), AuthError> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(AuthError::UsernameAlreadyUsed);
        }

        let existing = users.get_mut(&user.id).ok_or(AuthError::UserNotFound)?;
        existing.username = user.username.clone();
        existing.password = user.password.clone();
        existing.fullname = user.fullname.clone();
        existing.role = user.role;
        existing.updated_at = Utc::now();

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AuthError> {
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(AuthError::UserNotFound)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRefreshTokenStore {
    /// token -> (user id, created at)
    tokens: RwLock<HashMap<String, (String, DateTime<Utc>)>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn add_token(&self, token: &str, user_id: &str) -> Result<(), AuthError> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(token) {
            return Err(AuthError::internal(anyhow::anyhow!(
                "refresh token already recorded"
            )));
        }

        tokens.insert(token.to_string(), (user_id.to_string(), Utc::now()));

        Ok(())
    }

    async fn check_availability(&self, token: &str) -> Result<(), AuthError> {
        if self.tokens.read().await.contains_key(token) {
            Ok(())
        } else {
            Err(AuthError::RefreshTokenNotFound)
        }
    }

    async fn delete_token(&self, token: &str) -> Result<(), AuthError> {
        self.tokens
            .write()
            .await
            .remove(token)
            .map(|_| ())
            .ok_or(AuthError::RefreshTokenNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockflow_core::UserRole;

    fn sample_user(id: &str, username: &str) -> User {
        User::new(id, username, "$2b$04$hash", "Sample User", UserRole::Staff)
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = InMemoryUserStore::new();
        let created = store.create(&sample_user("user-1", "alice")).await.unwrap();

        assert_eq!(created.username, "alice");
        assert_eq!(store.get_by_id("user-1").await.unwrap(), created);
        assert_eq!(store.get_by_username("alice").await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = InMemoryUserStore::new();
        store.create(&sample_user("user-1", "alice")).await.unwrap();

        let result = store.create(&sample_user("user-2", "alice")).await;
        assert!(matches!(result, Err(AuthError::UsernameAlreadyUsed)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_user_not_found() {
        let store = InMemoryUserStore::new();
        assert!(matches!(
            store.get_by_id("nope").await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            store.get_by_username("nope").await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            store.delete("nope").await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            store.update(&sample_user("nope", "ghost")).await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_mutable_fields() {
        let store = InMemoryUserStore::new();
        let created = store.create(&sample_user("user-1", "alice")).await.unwrap();

        let mut changed = created.clone();
        changed.fullname = "Alice Manager".to_string();
        changed.role = UserRole::Manager;
        store.update(&changed).await.unwrap();

        let fetched = store.get_by_id("user-1").await.unwrap();
        assert_eq!(fetched.fullname, "Alice Manager");
        assert_eq!(fetched.role, UserRole::Manager);
        assert_eq!(fetched.created_at, created.created_at);
        assert!(fetched.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_cannot_steal_username() {
        let store = InMemoryUserStore::new();
        store.create(&sample_user("user-1", "alice")).await.unwrap();
        store.create(&sample_user("user-2", "bob")).await.unwrap();

        let result = store.update(&sample_user("user-2", "alice")).await;
        assert!(matches!(result, Err(AuthError::UsernameAlreadyUsed)));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let store = InMemoryUserStore::new();
        store.create(&sample_user("user-1", "alice")).await.unwrap();
        store.delete("user-1").await.unwrap();

        assert!(store.is_empty().await);
        assert!(matches!(
            store.get_by_username("alice").await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_refresh_token_lifecycle() {
        let store = InMemoryRefreshTokenStore::new();

        assert!(matches!(
            store.check_availability("tok").await,
            Err(AuthError::RefreshTokenNotFound)
        ));

        store.add_token("tok", "user-1").await.unwrap();
        store.check_availability("tok").await.unwrap();

        store.delete_token("tok").await.unwrap();
        assert!(matches!(
            store.check_availability("tok").await,
            Err(AuthError::RefreshTokenNotFound)
        ));
        assert!(matches!(
            store.delete_token("tok").await,
            Err(AuthError::RefreshTokenNotFound)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_refresh_token_rejected() {
        let store = InMemoryRefreshTokenStore::new();
        store.add_token("tok", "user-1").await.unwrap();

        assert!(matches!(
            store.add_token("tok", "user-1").await,
            Err(AuthError::Internal(_))
        ));
        assert_eq!(store.len().await, 1);
    }
}
