/// Failed Login Counter
///
/// Best-effort throttle: concurrent failures may overshoot `max_attempts`
/// slightly. The window runs from the first failure and is not extended by
/// later ones.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheError, CacheKeys, TokenCache};

pub struct FailedAttemptCounter {
    cache: Arc<dyn TokenCache>,
    keys: CacheKeys,
    max_attempts: i64,
    window: Duration,
}

impl FailedAttemptCounter {
    pub fn new(
        cache: Arc<dyn TokenCache>,
        keys: CacheKeys,
        max_attempts: i64,
        window: Duration,
    ) -> Self {
        Self {
            cache,
            keys,
            max_attempts,
            window,
        }
    }

    /// Record one failed login and return the count within the current window
    pub async fn record_failure(&self, user_id: &str) -> Result<i64, CacheError> {
        self.cache
            .increment(&self.keys.incorrect_password(user_id), self.window)
            .await
    }

    pub fn is_exhausted(&self, count: i64) -> bool {
        count >= self.max_attempts
    }
}
