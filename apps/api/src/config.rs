use anyhow::{Context, Result};

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:8080",
    "http://127.0.0.1:8080",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

/// Application configuration loaded from environment variables.
/// Every variable is optional; without `DATABASE_URL` users and tokens live in memory.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub google_client_id: Option<String>,
    pub allowed_origins: Vec<String>,
    pub token_ttl_hours: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            google_client_id: optional_env("GOOGLE_CLIENT_ID"),
            allowed_origins: parse_origins(optional_env("ALLOWED_ORIGINS").as_deref()),
            token_ttl_hours: optional_env("TOKEN_TTL_HOURS")
                .map(|v| v.parse::<i64>())
                .transpose()
                .context("TOKEN_TTL_HOURS must be a whole number of hours")?
                .unwrap_or(24),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Comma-separated origins; falls back to the local dev servers.
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
    } else {
        origins
    }
}
