/// Authentication Service
///
/// Composes the credential store, password hasher, token codec and token
/// cache into the two operations exposed to transport layers: `login` and
/// `refresh`. The service holds no mutable state of its own; everything that
/// changes lives in the token cache, so one instance can serve any number of
/// concurrent requests.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::auth::jwt::{TokenCodec, TokenError, TokenKind};
use crate::auth::lockout::FailedAttemptCounter;
use crate::auth::password::PasswordHasher;
use crate::auth::refresh_token::RefreshTokenCache;
use crate::cache::{CacheKeys, TokenCache};
use crate::configuration::{AuthSettings, JwtSettings};
use crate::error::AuthError;
use crate::store::{CredentialStore, Identity};

/// Access and refresh token issued by a successful login
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    codec: TokenCodec,
    refresh_tokens: RefreshTokenCache,
    failed_attempts: FailedAttemptCounter,
    refresh_threshold: Duration,
    timeout: Duration,
}

impl AuthService {
    pub fn new(
        jwt: &JwtSettings,
        auth: &AuthSettings,
        store: Arc<dyn CredentialStore>,
        cache: Arc<dyn TokenCache>,
    ) -> Self {
        let keys = CacheKeys::new(auth.cache_prefix.clone());

        Self {
            store,
            hasher: PasswordHasher::new(auth.bcrypt_cost),
            codec: TokenCodec::new(jwt),
            refresh_tokens: RefreshTokenCache::new(cache.clone(), keys.clone()),
            failed_attempts: FailedAttemptCounter::new(
                cache,
                keys,
                auth.max_login_attempts,
                auth.lockout_window(),
            ),
            refresh_threshold: auth.refresh_threshold(),
            timeout: auth.request_timeout(),
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Authenticate with username and password and issue a fresh token pair.
    ///
    /// The new refresh token replaces any previously cached one, so earlier
    /// sessions stop being refreshable.
    ///
    /// # Errors
    /// - `InvalidCredentials` for an unknown user or a wrong password
    /// - `MaxAttemptsReached` when a wrong password brings the user's failure
    ///   count to the configured maximum
    /// - `System` when the store or cache fails, or the deadline passes
    #[tracing::instrument(name = "login", skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        tokio::time::timeout(self.timeout, self.login_inner(username, password))
            .await
            .map_err(|_| AuthError::timed_out("login"))?
    }

    /// Exchange a near-expiry (or expired) access token and the user's current
    /// refresh token for a new access token. The refresh token itself is not
    /// rotated.
    ///
    /// # Errors
    /// - `InvalidRefreshToken` when the refresh token is invalid, expired, or
    ///   not the one cached for the access token's subject
    /// - `InvalidToken` when the access token is malformed or badly signed
    /// - `ConditionNotFulfilled` when the access token is not yet close to expiry
    /// - `System` when the cache fails or the deadline passes
    #[tracing::instrument(name = "refresh", skip_all)]
    pub async fn refresh(&self, access_token: &str, refresh_token: &str) -> Result<String, AuthError> {
        tokio::time::timeout(self.timeout, self.refresh_inner(access_token, refresh_token))
            .await
            .map_err(|_| AuthError::timed_out("refresh"))?
    }

    async fn login_inner(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let identity = self
            .store
            .find_by_username(username)
            .await
            .map_err(|e| AuthError::system("login.find_by_username", e))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &identity).await? {
            let failures = self
                .failed_attempts
                .record_failure(&identity.id)
                .await
                .map_err(|e| AuthError::system("login.record_failure", e))?;

            if self.failed_attempts.is_exhausted(failures) {
                tracing::warn!(user_id = %identity.id, failures, "Login locked out");
                return Err(AuthError::MaxAttemptsReached);
            }

            tracing::warn!(user_id = %identity.id, failures, "Incorrect password");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.issue(TokenKind::Access, &identity.id, &identity.username, "login.issue_access_token")?;
        let refresh_token = self.issue(TokenKind::Refresh, &identity.id, &identity.username, "login.issue_refresh_token")?;

        self.refresh_tokens
            .store(&identity.id, &refresh_token)
            .await
            .map_err(|e| AuthError::system("login.cache_refresh_token", e))?;

        tracing::info!(user_id = %identity.id, "User logged in successfully");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    async fn refresh_inner(&self, access_token: &str, refresh_token: &str) -> Result<String, AuthError> {
        self.codec
            .parse_strict(TokenKind::Refresh, refresh_token)
            .map_err(|e| {
                tracing::warn!(error = %e, "Refresh token rejected");
                AuthError::InvalidRefreshToken
            })?;

        let access = self
            .codec
            .parse_ignoring_expiry(TokenKind::Access, access_token)
            .map_err(|e| {
                tracing::warn!(error = %e, "Access token rejected");
                AuthError::InvalidToken
            })?;

        if !access.expires_within(self.refresh_threshold) {
            tracing::warn!(
                user_id = %access.sub,
                remaining_secs = access.remaining(),
                "Access token refreshed too early"
            );
            return Err(AuthError::ConditionNotFulfilled);
        }

        let cached = self
            .refresh_tokens
            .current(&access.sub)
            .await
            .map_err(|e| AuthError::system("refresh.cached_refresh_token", e))?;

        if cached.as_deref() != Some(refresh_token) {
            tracing::warn!(user_id = %access.sub, "Refresh token does not match current session");
            return Err(AuthError::InvalidRefreshToken);
        }

        let new_access_token = self.issue(TokenKind::Access, &access.sub, &access.username, "refresh.issue_access_token")?;

        tracing::info!(user_id = %access.sub, "Access token refreshed");

        Ok(new_access_token)
    }

    /// Hash a plaintext password with the configured cost, for the user
    /// management layer that owns credential records.
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher;
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::system("hash_password", e))?
            .map_err(|e| AuthError::system("hash_password", e))
    }

    // bcrypt is deliberately slow; keep it off the async workers.
    async fn verify_password(&self, password: &str, identity: &Identity) -> Result<bool, AuthError> {
        let hasher = self.hasher;
        let password = password.to_string();
        let hash = identity.password_hash.clone();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::system("login.verify_password", e))?
            .map_err(|e| AuthError::system("login.verify_password", e))
    }

    fn issue(
        &self,
        kind: TokenKind,
        subject: &str,
        username: &str,
        operation: &'static str,
    ) -> Result<String, AuthError> {
        self.codec
            .issue(kind, subject, username)
            .map_err(|e: TokenError| AuthError::system(operation, e))
    }
}
