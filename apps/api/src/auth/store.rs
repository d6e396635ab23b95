//! User and token persistence seams.
//!
//! `PgStore` (see `postgres.rs`) backs production; `MemoryStore` serves local
//! runs without a database and the test suite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::user::{AuthTokenRow, NewUser, User, PROVIDER_GOOGLE};

pub const DUPLICATE_EMAIL: &str = "Email already registered";

/// Profile fields written when a Google identity is linked or refreshed.
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub profile_image_url: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_google_sub(&self, google_sub: &str) -> Result<Option<User>, AppError>;
    /// Fails with `Validation(DUPLICATE_EMAIL)` when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;
    /// Attaches a Google subject to an existing account and switches its provider.
    async fn link_google(
        &self,
        user_id: i64,
        google_sub: &str,
        profile: ProfileUpdate,
    ) -> Result<Option<User>, AppError>;
    async fn update_profile(
        &self,
        user_id: i64,
        profile: ProfileUpdate,
    ) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert_token(
        &self,
        user_id: i64,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AuthTokenRow, AppError>;
    /// Most recently issued row for `access_token`.
    async fn find_token(&self, access_token: &str) -> Result<Option<AuthTokenRow>, AppError>;
}

#[derive(Default)]
struct MemoryTables {
    users: Vec<User>,
    tokens: Vec<AuthTokenRow>,
}

/// In-process store with the same semantics as the Postgres tables.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<MemoryTables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_profile(user: &mut User, profile: ProfileUpdate) {
    if let Some(name) = profile.full_name {
        user.full_name = name;
    }
    if let Some(url) = profile.profile_image_url {
        user.profile_image_url = Some(url);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_google_sub(&self, google_sub: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.google_sub.as_deref() == Some(google_sub))
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Validation(DUPLICATE_EMAIL.to_string()));
        }
        let row = User {
            id: tables.users.len() as i64 + 1,
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash,
            password_salt: user.password_salt,
            google_sub: user.google_sub,
            auth_provider: user.auth_provider,
            profile_image_url: user.profile_image_url,
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn link_google(
        &self,
        user_id: i64,
        google_sub: &str,
        profile: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        user.google_sub = Some(google_sub.to_string());
        user.auth_provider = PROVIDER_GOOGLE.to_string();
        apply_profile(user, profile);
        Ok(Some(user.clone()))
    }

    async fn update_profile(
        &self,
        user_id: i64,
        profile: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        apply_profile(user, profile);
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn insert_token(
        &self,
        user_id: i64,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AuthTokenRow, AppError> {
        let mut tables = self.tables.write().await;
        let row = AuthTokenRow {
            id: tables.tokens.len() as i64 + 1,
            user_id,
            access_token: access_token.to_string(),
            expires_at,
            created_at: Utc::now(),
        };
        tables.tokens.push(row.clone());
        Ok(row)
    }

    async fn find_token(&self, access_token: &str) -> Result<Option<AuthTokenRow>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tokens
            .iter()
            .rev()
            .find(|t| t.access_token == access_token)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::user::PROVIDER_PASSWORD;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            full_name: "Layla Hassan".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            password_salt: "salt".to_string(),
            google_sub: None,
            auth_provider: PROVIDER_PASSWORD.to_string(),
            profile_image_url: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_rejects_duplicates() {
        let store = MemoryStore::new();
        let first = store.insert_user(new_user("a@example.com")).await.unwrap();
        let second = store.insert_user(new_user("b@example.com")).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        let err = store.insert_user(new_user("a@example.com")).await.unwrap_err();
        assert_eq!(err.to_string(), DUPLICATE_EMAIL);
    }

    #[tokio::test]
    async fn test_link_google_switches_provider() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("a@example.com")).await.unwrap();
        let linked = store
            .link_google(
                user.id,
                "google-sub-1",
                ProfileUpdate {
                    full_name: Some("Layla H.".to_string()),
                    profile_image_url: Some("https://img/1".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(linked.uses_google());
        assert_eq!(linked.full_name, "Layla H.");

        let found = store.find_by_google_sub("google-sub-1").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(store.link_google(99, "x", ProfileUpdate::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_token_returns_latest_row() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert_token(1, "tok", now - Duration::hours(1)).await.unwrap();
        store.insert_token(1, "tok", now + Duration::hours(1)).await.unwrap();
        let row = store.find_token("tok").await.unwrap().unwrap();
        assert_eq!(row.id, 2);
        assert!(store.find_token("other").await.unwrap().is_none());
    }
}
