//! Google ID token verification via the tokeninfo endpoint.
//! Docs: https://developers.google.com/identity/sign-in/web/backend-auth

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::auth::models::GoogleIdentity;
use crate::errors::AppError;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const INVALID_TOKEN: &str = "Invalid Google identity token";

#[async_trait]
pub trait GoogleVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AppError>;
}

#[derive(Clone)]
pub struct TokeninfoVerifier {
    http: Client,
    client_id: Option<String>,
}

impl TokeninfoVerifier {
    pub fn new(client_id: Option<String>) -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            client_id,
        }
    }
}

#[async_trait]
impl GoogleVerifier for TokeninfoVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, AppError> {
        let client_id = self.client_id.as_deref().ok_or_else(|| {
            AppError::Unauthorized("Google sign-in is not configured on the server".to_string())
        })?;

        let response = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP error contacting Google tokeninfo endpoint");
                AppError::Unauthorized(INVALID_TOKEN.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(http_status = %status, "Google tokeninfo rejected the id_token");
            return Err(AppError::Unauthorized(INVALID_TOKEN.to_string()));
        }

        let claims: Value = response.json().await.map_err(|e| {
            warn!(error = %e, "Malformed Google tokeninfo response");
            AppError::Unauthorized(INVALID_TOKEN.to_string())
        })?;

        identity_from_claims(&claims, client_id, Utc::now().timestamp())
    }
}

/// Validates tokeninfo claims and extracts the identity.
///
/// tokeninfo encodes booleans and numbers as strings (`"true"`, `"1700000000"`);
/// native JSON values are accepted too.
pub fn identity_from_claims(
    claims: &Value,
    client_id: &str,
    now: i64,
) -> Result<GoogleIdentity, AppError> {
    let audience = claims.get("aud").and_then(Value::as_str);
    if audience != Some(client_id) {
        warn!(token_audience = ?audience, "Google token audience mismatch");
        return Err(AppError::Unauthorized(INVALID_TOKEN.to_string()));
    }

    if let Some(exp) = claims.get("exp").and_then(as_i64) {
        if exp <= now {
            warn!(token_exp = exp, current_time = now, "Google token has expired");
            return Err(AppError::Unauthorized(INVALID_TOKEN.to_string()));
        }
    }

    if !claims.get("email_verified").map(as_bool).unwrap_or(false) {
        return Err(AppError::Unauthorized(
            "Google email is not verified".to_string(),
        ));
    }

    let text = |key: &str| {
        claims
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    };

    let sub = text("sub");
    let email = text("email").to_lowercase();
    if sub.is_empty() || email.is_empty() {
        return Err(AppError::Unauthorized(INVALID_TOKEN.to_string()));
    }

    let picture = text("picture");
    debug!(google_sub = %sub, "Google identity verified");

    Ok(GoogleIdentity {
        sub,
        email,
        name: text("name"),
        picture: (!picture.is_empty()).then_some(picture),
    })
}

fn as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const CLIENT_ID: &str = "client-123.apps.googleusercontent.com";
    const NOW: i64 = 1_700_000_000;

    fn claims() -> Value {
        json!({
            "aud": CLIENT_ID,
            "sub": "1098765",
            "email": "Layla@Example.com",
            "email_verified": "true",
            "name": "Layla Hassan",
            "picture": "https://lh3.googleusercontent.com/a/photo",
            "exp": (NOW + 600).to_string()
        })
    }

    #[test]
    fn test_valid_claims_produce_identity() {
        let identity = identity_from_claims(&claims(), CLIENT_ID, NOW).unwrap();
        assert_eq!(identity.sub, "1098765");
        assert_eq!(identity.email, "layla@example.com");
        assert_eq!(identity.name, "Layla Hassan");
        assert!(identity.picture.is_some());
    }

    #[test]
    fn test_native_json_types_accepted() {
        let mut c = claims();
        c["email_verified"] = json!(true);
        c["exp"] = json!(NOW + 60);
        assert!(identity_from_claims(&c, CLIENT_ID, NOW).is_ok());
    }

    #[test]
    fn test_audience_mismatch_rejected() {
        let err = identity_from_claims(&claims(), "other-client", NOW).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let err = identity_from_claims(&claims(), CLIENT_ID, NOW + 601).unwrap_err();
        assert_eq!(err.to_string(), INVALID_TOKEN);
    }

    #[test]
    fn test_unverified_email_rejected() {
        let mut c = claims();
        c["email_verified"] = json!("false");
        let err = identity_from_claims(&c, CLIENT_ID, NOW).unwrap_err();
        assert_eq!(err.to_string(), "Google email is not verified");
    }

    #[test]
    fn test_missing_subject_rejected() {
        let mut c = claims();
        c["sub"] = json!("  ");
        assert!(identity_from_claims(&c, CLIENT_ID, NOW).is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_client_id() {
        let err = TokeninfoVerifier::new(None)
            .verify("x".repeat(40).as_str())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Google sign-in is not configured on the server");
    }
}
