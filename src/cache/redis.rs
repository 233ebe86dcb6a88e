use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::redis;
use deadpool_redis::{Config, Pool, PoolConfig, Runtime};

use super::{CacheError, TokenCache};
use crate::configuration::RedisSettings;

/// Redis-backed token cache over a `deadpool-redis` pool
#[derive(Clone)]
pub struct RedisTokenCache {
    pool: Pool,
}

impl RedisTokenCache {
    /// Build the pool. Connections are opened lazily on first use.
    pub fn new(settings: &RedisSettings) -> Result<Self, CacheError> {
        let mut config = Config::from_url(settings.url.clone());
        config.pool = Some(PoolConfig::new(settings.pool_size));
        let pool = config.create_pool(Some(Runtime::Tokio1))?;

        Ok(Self { pool })
    }
}

// Redis rejects `EX 0`; sub-second TTLs round up to one second.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

#[async_trait]
impl TokenCache for RedisTokenCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.pool.get().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = ttl {
            cmd.arg("EX").arg(ttl_secs(ttl));
        }
        cmd.query_async::<_, ()>(&mut conn).await?;

        Ok(())
    }

    async fn increment(&self, key: &str, ttl_on_create: Duration) -> Result<i64, CacheError> {
        let mut conn = self.pool.get().await?;
        // SET NX only creates the key (with its TTL) when absent; INCR keeps
        // whatever TTL the key already has.
        let (count,): (i64,) = redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(key)
            .arg(0)
            .arg("EX")
            .arg(ttl_secs(ttl_on_create))
            .arg("NX")
            .ignore()
            .cmd("INCR")
            .arg(key)
            .query_async(&mut conn)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_rounds_up_to_one_second() {
        assert_eq!(ttl_secs(Duration::from_millis(10)), 1);
        assert_eq!(ttl_secs(Duration::from_secs(86400)), 86400);
    }

    #[tokio::test]
    async fn pool_is_created_without_connecting() {
        let settings = RedisSettings {
            url: "redis://127.0.0.1:6379".to_string(),
            pool_size: 4,
        };

        let cache = RedisTokenCache::new(&settings).expect("Failed to build pool");
        assert_eq!(cache.pool.status().max_size, 4);
    }
}
