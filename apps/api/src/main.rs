mod ats;
mod auth;
mod config;
mod db;
mod errors;
mod extraction;
mod models;
mod response;
mod routes;
mod state;
mod validation;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::google::TokeninfoVerifier;
use crate::auth::postgres::PgStore;
use crate::auth::store::{MemoryStore, TokenStore, UserStore};
use crate::auth::AuthService;
use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::DocumentExtractor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS Buddy API v{}", env!("CARGO_PKG_VERSION"));

    let (users, tokens): (Arc<dyn UserStore>, Arc<dyn TokenStore>) = match &config.database_url {
        Some(url) => {
            let store = Arc::new(PgStore::new(create_pool(url).await?));
            (store.clone(), store)
        }
        None => {
            warn!("DATABASE_URL not set; users and sessions are kept in memory");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        }
    };

    if config.google_client_id.is_none() {
        warn!("GOOGLE_CLIENT_ID not set; Google sign-in is disabled");
    }

    let state = AppState {
        auth: AuthService::new(
            users,
            tokens,
            Arc::new(TokeninfoVerifier::new(config.google_client_id.clone())),
            chrono::Duration::hours(config.token_ttl_hours),
        ),
        extractor: Arc::new(DocumentExtractor),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Credentialed CORS for the configured front-end origins.
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid origin in ALLOWED_ORIGINS: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
