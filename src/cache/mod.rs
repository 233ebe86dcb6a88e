//! Token cache
//!
//! Key-value store holding the per-user refresh token and failed-login
//! counter. Any backend with atomic increment and TTL semantics fits.

mod memory;
mod redis;

use std::time::Duration;

use async_trait::async_trait;

pub use memory::InMemoryTokenCache;
pub use self::redis::RedisTokenCache;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to create cache pool: {0}")]
    CreatePool(#[from] deadpool_redis::CreatePoolError),

    #[error("cache connection unavailable: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("cache command failed: {0}")]
    Command(#[from] deadpool_redis::redis::RedisError),

    #[error("value at {key} is not an integer counter")]
    NotACounter { key: String },
}

#[async_trait]
pub trait TokenCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`. `ttl = None` keeps it until overwritten.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Atomically increment the counter at `key` and return the new value.
    ///
    /// A missing key is created at 1 with `ttl_on_create`; an existing key
    /// keeps its remaining TTL. A non-integer value is an error.
    async fn increment(&self, key: &str, ttl_on_create: Duration) -> Result<i64, CacheError>;
}

/// Cache key layout: `{prefix}:{kind}:{user id}`
#[derive(Clone, Debug)]
pub struct CacheKeys {
    prefix: String,
}

impl CacheKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn refresh_token(&self, user_id: &str) -> String {
        format!("{}:refresh_token:{}", self.prefix, user_id)
    }

    pub fn incorrect_password(&self, user_id: &str) -> String {
        format!("{}:incorrect_password:{}", self.prefix, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_per_kind() {
        let keys = CacheKeys::new("app");

        assert_eq!(keys.refresh_token("u1"), "app:refresh_token:u1");
        assert_eq!(keys.incorrect_password("u1"), "app:incorrect_password:u1");
    }
}
