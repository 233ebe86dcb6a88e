//! Credential store
//!
//! Read-only lookup of a user's identity and password hash. Users are
//! created and updated elsewhere.

mod memory;
mod postgres;

use async_trait::async_trait;

pub use memory::InMemoryCredentialStore;
pub use postgres::PgCredentialStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credential lookup failed: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when no user has this username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError>;
}
