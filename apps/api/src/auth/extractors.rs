//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, warn};

use crate::auth::models::RegisteredUser;
use crate::errors::AppError;
use crate::state::AppState;

const MISSING_BEARER: &str = "Authorization header with Bearer token is required";

/// Authenticated user extractor
///
/// Resolves `Authorization: Bearer <token>` through the auth service. Any
/// failure rejects the request with 401.
#[derive(Debug, Clone)]
pub struct AuthedUser(pub RegisteredUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();

        let token = bearer_token(header).ok_or_else(|| {
            warn!("Authentication failed: missing or malformed Authorization header");
            AppError::Unauthorized(MISSING_BEARER.to_string())
        })?;

        let user = state.auth.authenticate(token).await?;
        debug!(user_id = user.user_id, "Bearer token accepted");
        Ok(AuthedUser(user))
    }
}

/// Token part of a `Bearer <token>` header; the scheme is case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim())
}
