use async_trait::async_trait;
use sqlx::PgPool;

use super::{CredentialStore, Identity, StoreError};

/// Credential store over the `users` table
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            "SELECT id::text, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, password_hash)| Identity {
            id,
            username,
            password_hash,
        }))
    }
}
