/// Refresh Token Cache
///
/// At most one refresh token is valid per user: the one cached by the most
/// recent login. Writing a new one silently invalidates the previous token
/// even if it has not expired yet.

use std::sync::Arc;

use crate::cache::{CacheError, CacheKeys, TokenCache};

pub struct RefreshTokenCache {
    cache: Arc<dyn TokenCache>,
    keys: CacheKeys,
}

impl RefreshTokenCache {
    pub fn new(cache: Arc<dyn TokenCache>, keys: CacheKeys) -> Self {
        Self { cache, keys }
    }

    /// Overwrite the user's current refresh token. Last write wins.
    pub async fn store(&self, user_id: &str, token: &str) -> Result<(), CacheError> {
        self.cache
            .set(&self.keys.refresh_token(user_id), token, None)
            .await
    }

    pub async fn current(&self, user_id: &str) -> Result<Option<String>, CacheError> {
        self.cache.get(&self.keys.refresh_token(user_id)).await
    }
}
