use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const PROVIDER_PASSWORD: &str = "password";
pub const PROVIDER_GOOGLE: &str = "google";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub password_salt: String,
    pub google_sub: Option<String>,
    /// "password" | "google"
    pub auth_provider: String,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn uses_google(&self) -> bool {
        self.auth_provider == PROVIDER_GOOGLE
    }
}

/// Insert payload for `users`; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub google_sub: Option<String>,
    pub auth_provider: String,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthTokenRow {
    pub id: i64,
    pub user_id: i64,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
