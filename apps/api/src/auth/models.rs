//! Request and response bodies for the auth endpoints.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::User;
use crate::validation::{char_range, min_chars};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        char_range("full_name", &self.full_name, 2, 100)?;
        char_range("email", &self.email, 5, 255)?;
        char_range("password", &self.password, 8, 128)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        char_range("email", &self.email, 5, 255)?;
        char_range("password", &self.password, 8, 128)
    }
}

#[derive(Debug, Deserialize)]
pub struct GoogleAuthRequest {
    pub id_token: String,
}

impl GoogleAuthRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        min_chars("id_token", &self.id_token, 20)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub profile_image_url: Option<String>,
}

impl From<&User> for RegisteredUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            profile_image_url: user.profile_image_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub access_token: String,
    pub token_type: String,
}

/// Verified claims of a Google ID token.
#[derive(Debug, Clone, PartialEq)]
pub struct GoogleIdentity {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}
