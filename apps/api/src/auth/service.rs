use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use crate::auth::google::GoogleVerifier;
use crate::auth::models::{
    AuthResponse, GoogleAuthRequest, LoginRequest, RegisterRequest, RegisteredUser,
};
use crate::auth::password::{
    generate_access_token, generate_salt, hash_password, verify_password,
};
use crate::auth::store::{ProfileUpdate, TokenStore, UserStore};
use crate::errors::AppError;
use crate::models::user::{NewUser, User, PROVIDER_GOOGLE, PROVIDER_PASSWORD};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Registration, login, Google sign-in and bearer-token sessions.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenStore>,
    google: Arc<dyn GoogleVerifier>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        google: Arc<dyn GoogleVerifier>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            tokens,
            google,
            token_ttl,
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisteredUser, AppError> {
        let email = normalize_email(&request.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Validation("Email already registered".to_string()));
        }

        let salt = generate_salt();
        let user = self
            .users
            .insert_user(NewUser {
                full_name: request.full_name.trim().to_string(),
                email,
                password_hash: hash_password(&request.password, &salt)?,
                password_salt: salt,
                google_sub: None,
                auth_provider: PROVIDER_PASSWORD.to_string(),
                profile_image_url: None,
            })
            .await?;

        info!(user_id = user.id, "Registered new user");
        Ok(RegisteredUser::from(&user))
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if user.uses_google() {
            return Err(AppError::Unauthorized(
                "This account uses Google sign-in. Please continue with Google.".to_string(),
            ));
        }

        if !verify_password(&request.password, &user.password_salt, &user.password_hash) {
            warn!(user_id = user.id, "Password login failed");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        self.issue_token(&user).await
    }

    /// Signs in with a Google ID token: known subject, then email link, then a
    /// fresh Google-only account.
    pub async fn google_auth(&self, request: &GoogleAuthRequest) -> Result<AuthResponse, AppError> {
        let identity = self.google.verify(&request.id_token).await?;
        let profile = ProfileUpdate {
            full_name: (!identity.name.is_empty()).then(|| identity.name.clone()),
            profile_image_url: identity.picture.clone(),
        };

        if let Some(user) = self.users.find_by_google_sub(&identity.sub).await? {
            let refreshed = self
                .users
                .update_profile(user.id, profile)
                .await?
                .ok_or_else(|| {
                    AppError::Unauthorized("Unable to refresh Google profile".to_string())
                })?;
            return self.issue_token(&refreshed).await;
        }

        if let Some(user) = self.users.find_by_email(&identity.email).await? {
            if user
                .google_sub
                .as_deref()
                .is_some_and(|sub| sub != identity.sub)
            {
                return Err(AppError::Unauthorized(
                    "Google account mismatch for this email".to_string(),
                ));
            }
            let linked = self
                .users
                .link_google(user.id, &identity.sub, profile)
                .await?
                .ok_or_else(|| {
                    AppError::Unauthorized("Unable to link Google account".to_string())
                })?;
            info!(user_id = linked.id, "Linked Google account to existing user");
            return self.issue_token(&linked).await;
        }

        // Google-only accounts get a random password nobody knows
        let salt = generate_salt();
        let placeholder_hash = hash_password(&generate_access_token(), &salt)?;
        let full_name = profile.full_name.unwrap_or_else(|| {
            identity
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        });

        let created = self
            .users
            .insert_user(NewUser {
                full_name,
                email: identity.email.clone(),
                password_hash: placeholder_hash,
                password_salt: salt,
                google_sub: Some(identity.sub.clone()),
                auth_provider: PROVIDER_GOOGLE.to_string(),
                profile_image_url: identity.picture.clone(),
            })
            .await
            .map_err(|e| match e {
                // another sign-in claimed the email between lookup and insert
                AppError::Validation(message) => AppError::Unauthorized(message),
                other => other,
            })?;
        info!(user_id = created.id, "Created Google user");

        self.issue_token(&created).await
    }

    /// Resolves a bearer token to its user.
    pub async fn authenticate(&self, access_token: &str) -> Result<RegisteredUser, AppError> {
        if access_token.is_empty() {
            return Err(AppError::Unauthorized("Missing access token".to_string()));
        }

        let token = self
            .tokens
            .find_token(access_token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

        if token.expires_at <= Utc::now() {
            return Err(AppError::Unauthorized("Token expired".to_string()));
        }

        let user = self
            .users
            .find_by_id(token.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

        Ok(RegisteredUser::from(&user))
    }

    async fn issue_token(&self, user: &User) -> Result<AuthResponse, AppError> {
        let access_token = generate_access_token();
        let expires_at = Utc::now() + self.token_ttl;
        self.tokens
            .insert_token(user.id, &access_token, expires_at)
            .await?;

        Ok(AuthResponse {
            user_id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            access_token,
            token_type: "Bearer".to_string(),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
pub(crate) mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::auth::models::GoogleIdentity;
    use crate::auth::store::MemoryStore;

    /// Verifier that accepts any token and returns a fixed identity.
    pub(crate) struct FixedGoogleVerifier(pub GoogleIdentity);

    #[async_trait]
    impl GoogleVerifier for FixedGoogleVerifier {
        async fn verify(&self, _id_token: &str) -> Result<GoogleIdentity, AppError> {
            Ok(self.0.clone())
        }
    }

    fn identity(sub: &str, email: &str) -> GoogleIdentity {
        GoogleIdentity {
            sub: sub.to_string(),
            email: email.to_string(),
            name: "Omar Saeed".to_string(),
            picture: Some("https://img/omar".to_string()),
        }
    }

    fn service_with(identity: GoogleIdentity, ttl: Duration) -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = AuthService::new(
            store.clone(),
            store.clone(),
            Arc::new(FixedGoogleVerifier(identity)),
            ttl,
        );
        (service, store)
    }

    fn service() -> AuthService {
        service_with(identity("sub-1", "omar@example.com"), Duration::hours(24)).0
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            full_name: "  Omar Saeed ".to_string(),
            email: email.to_string(),
            password: "s3cure-passw0rd".to_string(),
        }
    }

    fn google_request() -> GoogleAuthRequest {
        GoogleAuthRequest {
            id_token: "g".repeat(32),
        }
    }

    #[tokio::test]
    async fn test_register_login_authenticate() {
        let auth = service();
        let user = auth
            .register(&register_request(" Omar@Example.COM "))
            .await
            .unwrap();
        assert_eq!(user.email, "omar@example.com");
        assert_eq!(user.full_name, "Omar Saeed");

        let session = auth
            .login(&LoginRequest {
                email: "omar@example.com".to_string(),
                password: "s3cure-passw0rd".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.token_type, "Bearer");
        assert_eq!(session.user_id, user.user_id);

        let resolved = auth.authenticate(&session.access_token).await.unwrap();
        assert_eq!(resolved, user);
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let auth = service();
        auth.register(&register_request("omar@example.com")).await.unwrap();
        let err = auth
            .register(&register_request("OMAR@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Email already registered"));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() {
        let auth = service();
        auth.register(&register_request("omar@example.com")).await.unwrap();
        for (email, password) in [
            ("omar@example.com", "not-the-password"),
            ("nobody@example.com", "s3cure-passw0rd"),
        ] {
            let err = auth
                .login(&LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), INVALID_CREDENTIALS);
        }
    }

    #[tokio::test]
    async fn test_authenticate_failures() {
        let (auth, store) = service_with(identity("s", "e@example.com"), Duration::hours(24));
        assert_eq!(
            auth.authenticate("").await.unwrap_err().to_string(),
            "Missing access token"
        );
        assert_eq!(
            auth.authenticate("unknown").await.unwrap_err().to_string(),
            "Invalid token"
        );

        let user = auth.register(&register_request("e@example.com")).await.unwrap();
        store
            .insert_token(user.user_id, "stale", Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(
            auth.authenticate("stale").await.unwrap_err().to_string(),
            "Token expired"
        );
    }

    #[tokio::test]
    async fn test_google_creates_then_reuses_account() {
        let (auth, store) = service_with(identity("sub-9", "new@example.com"), Duration::hours(24));
        let first = auth.google_auth(&google_request()).await.unwrap();
        let second = auth.google_auth(&google_request()).await.unwrap();
        assert_eq!(first.user_id, second.user_id);
        assert_ne!(first.access_token, second.access_token);

        let stored = store.find_by_google_sub("sub-9").await.unwrap().unwrap();
        assert!(stored.uses_google());
        assert_eq!(stored.full_name, "Omar Saeed");

        // Google-only accounts cannot use password login
        let err = auth
            .login(&LoginRequest {
                email: "new@example.com".to_string(),
                password: "whatever-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Google sign-in"));
    }

    #[tokio::test]
    async fn test_google_links_existing_password_account() {
        let (auth, store) =
            service_with(identity("sub-2", "omar@example.com"), Duration::hours(24));
        let registered = auth.register(&register_request("omar@example.com")).await.unwrap();

        let session = auth.google_auth(&google_request()).await.unwrap();
        assert_eq!(session.user_id, registered.user_id);

        let linked = store.find_by_id(registered.user_id).await.unwrap().unwrap();
        assert_eq!(linked.google_sub.as_deref(), Some("sub-2"));
        assert_eq!(linked.profile_image_url.as_deref(), Some("https://img/omar"));
    }

    #[tokio::test]
    async fn test_google_subject_mismatch_rejected() {
        let (auth, store) =
            service_with(identity("sub-new", "omar@example.com"), Duration::hours(24));
        let registered = auth.register(&register_request("omar@example.com")).await.unwrap();
        store
            .link_google(registered.user_id, "sub-old", ProfileUpdate::default())
            .await
            .unwrap();

        let err = auth.google_auth(&google_request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Google account mismatch for this email");
    }

    #[tokio::test]
    async fn test_google_name_defaults_to_email_local_part() {
        let mut anonymous = identity("sub-3", "dana.k@example.com");
        anonymous.name = String::new();
        let (auth, _) = service_with(anonymous, Duration::hours(24));
        let session = auth.google_auth(&google_request()).await.unwrap();
        assert_eq!(session.full_name, "dana.k");
    }

    #[tokio::test]
    async fn test_token_ttl_is_applied() {
        let (auth, _) = service_with(identity("s", "e@example.com"), Duration::zero());
        auth.register(&register_request("ttl@example.com")).await.unwrap();
        let session = auth
            .login(&LoginRequest {
                email: "ttl@example.com".to_string(),
                password: "s3cure-passw0rd".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            auth.authenticate(&session.access_token)
                .await
                .unwrap_err()
                .to_string(),
            "Token expired"
        );
    }

    /// Hides existing emails from lookups, as a concurrent sign-in would.
    struct StaleEmailLookup(Arc<MemoryStore>);

    #[async_trait]
    impl UserStore for StaleEmailLookup {
        async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
            self.0.find_by_id(id).await
        }
        async fn find_by_email(&self, _email: &str) -> Result<Option<User>, AppError> {
            Ok(None)
        }
        async fn find_by_google_sub(&self, google_sub: &str) -> Result<Option<User>, AppError> {
            self.0.find_by_google_sub(google_sub).await
        }
        async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
            self.0.insert_user(user).await
        }
        async fn link_google(
            &self,
            user_id: i64,
            google_sub: &str,
            profile: ProfileUpdate,
        ) -> Result<Option<User>, AppError> {
            self.0.link_google(user_id, google_sub, profile).await
        }
        async fn update_profile(
            &self,
            user_id: i64,
            profile: ProfileUpdate,
        ) -> Result<Option<User>, AppError> {
            self.0.update_profile(user_id, profile).await
        }
    }

    #[tokio::test]
    async fn test_google_signup_losing_email_race_is_401() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(
            Arc::new(StaleEmailLookup(store.clone())),
            store.clone(),
            Arc::new(FixedGoogleVerifier(identity("sub-2", "omar@example.com"))),
            Duration::hours(24),
        );
        auth.register(&register_request("omar@example.com")).await.unwrap();

        let err = auth.google_auth(&google_request()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Email already registered"));
    }
}
