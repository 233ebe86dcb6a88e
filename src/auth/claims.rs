/// JWT Claims structure
///
/// Payload shared by access and refresh tokens. The two kinds differ only in
/// the key that signs them and their lifetime.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token ID, unique per issued token
    pub jti: String,
}

impl Claims {
    /// Create claims valid from now until `now + ttl`
    pub fn new(
        subject: &str,
        username: &str,
        issuer: &str,
        audience: &str,
        ttl: Duration,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: subject.to_string(),
            username: username.to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: now,
            exp: now.saturating_add(secs(ttl)),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Seconds until expiry, negative once the token has expired
    pub fn remaining(&self) -> i64 {
        self.exp - chrono::Utc::now().timestamp()
    }

    /// Whether the token expires within `threshold` (or already has)
    pub fn expires_within(&self, threshold: Duration) -> bool {
        self.remaining() <= secs(threshold)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining() < 0
    }
}

// Saturates instead of wrapping for durations past `i64::MAX` seconds.
fn secs(duration: Duration) -> i64 {
    i64::try_from(duration.as_secs()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new("u1", "alice", "test", "all", Duration::from_secs(3600));

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.iss, "test");
        assert_eq!(claims.aud, "all");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_token_ids_are_unique() {
        let first = Claims::new("u1", "alice", "test", "all", Duration::from_secs(60));
        let second = Claims::new("u1", "alice", "test", "all", Duration::from_secs(60));

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_near_expiry_window() {
        let threshold = Duration::from_secs(60);

        let fresh = Claims::new("u1", "alice", "test", "all", Duration::from_secs(900));
        assert!(!fresh.expires_within(threshold));

        let closing = Claims::new("u1", "alice", "test", "all", Duration::from_secs(30));
        assert!(closing.expires_within(threshold));

        let mut expired = fresh.clone();
        expired.exp = expired.iat - 10;
        assert!(expired.is_expired());
        assert!(expired.expires_within(threshold));
    }

    #[test]
    fn test_huge_ttl_saturates_instead_of_expiring() {
        let claims = Claims::new("u1", "alice", "test", "all", Duration::from_secs(u64::MAX));

        assert_eq!(claims.exp, i64::MAX);
        assert!(!claims.is_expired());
        assert!(claims.remaining() > 0);
        assert!(claims.expires_within(Duration::from_secs(u64::MAX)));
    }
}
