/// JWT Token Generation and Validation
///
/// Signs and parses access and refresh tokens. Each kind has its own HS256
/// secret and lifetime; issuer and audience identify this deployment.

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Signature and structure are fine, only `exp` has passed
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl KeyPair {
    fn from_secret(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// Token codec holding both key sets
#[derive(Clone)]
pub struct TokenCodec {
    access: KeyPair,
    refresh: KeyPair,
    issuer: String,
    audience: String,
}

impl TokenCodec {
    pub fn new(config: &JwtSettings) -> Self {
        Self {
            access: KeyPair::from_secret(&config.access_secret, config.access_token_ttl()),
            refresh: KeyPair::from_secret(&config.refresh_secret, config.refresh_token_ttl()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        }
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        self.keys(kind).ttl
    }

    /// Issue a signed token of `kind` for a user
    ///
    /// # Errors
    /// Returns error if token signing fails
    pub fn issue(&self, kind: TokenKind, subject: &str, username: &str) -> Result<String, TokenError> {
        let keys = self.keys(kind);
        let claims = Claims::new(subject, username, &self.issuer, &self.audience, keys.ttl);

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, issuer, audience and expiry
    ///
    /// # Errors
    /// `TokenError::Expired` when only the expiry check fails,
    /// `TokenError::Invalid` for anything else
    pub fn parse_strict(&self, kind: TokenKind, token: &str) -> Result<Claims, TokenError> {
        self.parse(kind, token, true)
    }

    /// Verify signature, issuer and audience, accepting an expired token
    pub fn parse_ignoring_expiry(&self, kind: TokenKind, token: &str) -> Result<Claims, TokenError> {
        self.parse(kind, token, false)
    }

    fn parse(&self, kind: TokenKind, token: &str, check_expiry: bool) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = 0;
        validation.validate_exp = check_expiry;

        decode::<Claims>(token, &self.keys(kind).decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    tracing::debug!(token_kind = ?kind, "JWT validation error: {}", e);
                    TokenError::Invalid(e.to_string())
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_config() -> JwtSettings {
        JwtSettings {
            access_secret: "access-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
            refresh_secret: "refresh-secret-key-at-least-32-characters".to_string(),
            refresh_token_expiry: 604800,
            issuer: "test".to_string(),
            audience: "all".to_string(),
        }
    }

    fn expired_access_token(config: &JwtSettings) -> String {
        let mut claims = Claims::new("u1", "alice", &config.issuer, &config.audience, Duration::from_secs(60));
        claims.iat -= 600;
        claims.exp = claims.iat + 60;

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .expect("Failed to encode token")
    }

    #[test]
    fn test_issue_and_parse_token() {
        let codec = TokenCodec::new(&get_test_config());

        let token = codec.issue(TokenKind::Access, "u1", "alice").expect("Failed to issue token");
        let claims = codec.parse_strict(TokenKind::Access, &token).expect("Failed to parse token");

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "test");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_refresh_token_uses_its_own_lifetime() {
        let codec = TokenCodec::new(&get_test_config());

        let token = codec.issue(TokenKind::Refresh, "u1", "alice").unwrap();
        let claims = codec.parse_strict(TokenKind::Refresh, &token).unwrap();

        assert_eq!(claims.exp - claims.iat, 604800);
    }

    #[test]
    fn test_kinds_do_not_cross_validate() {
        let codec = TokenCodec::new(&get_test_config());

        let access = codec.issue(TokenKind::Access, "u1", "alice").unwrap();
        let refresh = codec.issue(TokenKind::Refresh, "u1", "alice").unwrap();

        assert!(matches!(
            codec.parse_strict(TokenKind::Refresh, &access),
            Err(TokenError::Invalid(_))
        ));
        assert!(matches!(
            codec.parse_strict(TokenKind::Access, &refresh),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_invalid_token() {
        let codec = TokenCodec::new(&get_test_config());
        let result = codec.parse_strict(TokenKind::Access, "invalid.token.here");

        assert!(matches!(result, Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_tampered_token() {
        let codec = TokenCodec::new(&get_test_config());
        let token = codec.issue(TokenKind::Access, "u1", "alice").unwrap();

        let tampered = format!("{}X", token);

        assert!(codec.parse_strict(TokenKind::Access, &tampered).is_err());
        assert!(codec.parse_ignoring_expiry(TokenKind::Access, &tampered).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let mut config = get_test_config();
        let token = TokenCodec::new(&config).issue(TokenKind::Access, "u1", "alice").unwrap();

        config.issuer = "wrong-issuer".to_string();
        let result = TokenCodec::new(&config).parse_strict(TokenKind::Access, &token);

        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_is_distinguishable() {
        let config = get_test_config();
        let codec = TokenCodec::new(&config);
        let token = expired_access_token(&config);

        assert!(matches!(
            codec.parse_strict(TokenKind::Access, &token),
            Err(TokenError::Expired)
        ));

        let claims = codec
            .parse_ignoring_expiry(TokenKind::Access, &token)
            .expect("Expired token should still parse");
        assert_eq!(claims.sub, "u1");
        assert!(claims.is_expired());
    }
}
