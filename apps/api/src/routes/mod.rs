pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ats::handlers as ats;
use crate::auth::handlers as auth;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health_handler))
        // ATS API (bearer auth)
        .route("/api/v1/ats/check", post(ats::handle_check))
        .route("/api/v1/resume/optimize", post(ats::handle_optimize))
        .route("/api/v1/resume/keyword-gap", post(ats::handle_keyword_gap))
        .route("/api/v1/resume/extract-text", post(ats::handle_extract_text))
        // Auth API
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/google", post(auth::handle_google))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .with_state(state)
}
