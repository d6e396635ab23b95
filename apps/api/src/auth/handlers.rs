//! Axum route handlers for the Auth API.

use axum::extract::State;

use crate::auth::extractors::AuthedUser;
use crate::auth::models::{
    AuthResponse, GoogleAuthRequest, LoginRequest, RegisterRequest, RegisteredUser,
};
use crate::errors::AppError;
use crate::response::{ApiJson, ApiResponse};
use crate::state::AppState;

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<ApiResponse<RegisteredUser>, AppError> {
    request.validate()?;
    let user = state.auth.register(&request).await?;
    Ok(ApiResponse::created(user))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    request.validate()?;
    let session = state.auth.login(&request).await?;
    Ok(ApiResponse::ok(session))
}

/// POST /api/v1/auth/google
pub async fn handle_google(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<GoogleAuthRequest>,
) -> Result<ApiResponse<AuthResponse>, AppError> {
    request.validate()?;
    let session = state.auth.google_auth(&request).await?;
    Ok(ApiResponse::ok(session))
}

/// GET /api/v1/auth/me
pub async fn handle_me(AuthedUser(user): AuthedUser) -> ApiResponse<RegisteredUser> {
    ApiResponse::ok(user)
}
