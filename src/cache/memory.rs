use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::{CacheError, TokenCache};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| deadline > now)
    }
}

/// Process-local token cache with per-entry deadlines
#[derive(Default)]
pub struct InMemoryTokenCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let mut entries = self.lock();

        let live = entries
            .get(key)
            .map(|entry| entry.is_live(now).then(|| entry.value.clone()));

        match live {
            Some(Some(value)) => Ok(Some(value)),
            Some(None) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );

        Ok(())
    }

    async fn increment(&self, key: &str, ttl_on_create: Duration) -> Result<i64, CacheError> {
        let now = Instant::now();
        let mut entries = self.lock();

        let (count, expires_at) = match entries.get(key).filter(|entry| entry.is_live(now)) {
            Some(entry) => {
                let count = entry
                    .value
                    .parse::<i64>()
                    .ok()
                    .and_then(|count| count.checked_add(1))
                    .ok_or_else(|| CacheError::NotACounter {
                        key: key.to_string(),
                    })?;
                (count, entry.expires_at)
            }
            None => (1, Some(now + ttl_on_create)),
        };

        entries.insert(
            key.to_string(),
            Entry {
                value: count.to_string(),
                expires_at,
            },
        );

        Ok(count)
    }
}
