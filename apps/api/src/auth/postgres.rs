use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::auth::store::{ProfileUpdate, TokenStore, UserStore, DUPLICATE_EMAIL};
use crate::errors::AppError;
use crate::models::user::{AuthTokenRow, NewUser, User, PROVIDER_GOOGLE};

const USER_COLUMNS: &str = "id, full_name, email, password_hash, password_salt, google_sub, \
                            auth_provider, profile_image_url, created_at";

/// `users` / `auth_tokens` tables in PostgreSQL.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_user_where(&self, column: &str, value: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {column} = $1"
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_user_where("email", email).await
    }

    async fn find_by_google_sub(&self, google_sub: &str) -> Result<Option<User>, AppError> {
        self.find_user_where("google_sub", google_sub).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let inserted = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users
                (full_name, email, password_hash, password_salt, google_sub,
                 auth_provider, profile_image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.password_salt)
        .bind(&user.google_sub)
        .bind(&user.auth_provider)
        .bind(&user.profile_image_url)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::Validation(DUPLICATE_EMAIL.to_string()))
            }
            Err(e) => Err(AppError::Database(e)),
        }
    }

    async fn link_google(
        &self,
        user_id: i64,
        google_sub: &str,
        profile: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET google_sub = $1,
                auth_provider = $2,
                full_name = COALESCE($3, full_name),
                profile_image_url = COALESCE($4, profile_image_url)
            WHERE id = $5
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(google_sub)
        .bind(PROVIDER_GOOGLE)
        .bind(profile.full_name)
        .bind(profile.profile_image_url)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_profile(
        &self,
        user_id: i64,
        profile: ProfileUpdate,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($1, full_name),
                profile_image_url = COALESCE($2, profile_image_url)
            WHERE id = $3
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(profile.full_name)
        .bind(profile.profile_image_url)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TokenStore for PgStore {
    async fn insert_token(
        &self,
        user_id: i64,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AuthTokenRow, AppError> {
        let row = sqlx::query_as::<_, AuthTokenRow>(
            r#"
            INSERT INTO auth_tokens (user_id, access_token, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, access_token, expires_at, created_at
            "#,
        )
        .bind(user_id)
        .bind(access_token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_token(&self, access_token: &str) -> Result<Option<AuthTokenRow>, AppError> {
        let row = sqlx::query_as::<_, AuthTokenRow>(
            r#"
            SELECT id, user_id, access_token, expires_at, created_at
            FROM auth_tokens
            WHERE access_token = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(access_token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
