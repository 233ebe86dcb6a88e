/// Password Hashing and Verification
///
/// bcrypt with a tunable cost. A wrong password is `Ok(false)`, never an
/// error, so callers can feed it to the failed-attempt counter.

use bcrypt::{hash, verify, BcryptError};

/// Lowest cost bcrypt accepts; only suitable for tests.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(#[source] BcryptError),

    #[error("stored password hash is unusable: {0}")]
    MalformedHash(#[source] BcryptError),
}

#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password using bcrypt
    ///
    /// # Errors
    /// Returns error if bcrypt cannot produce a hash (bad cost, no entropy)
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        hash(password, self.cost).map_err(PasswordError::Hashing)
    }

    /// Verify a password against its hash in constant time
    ///
    /// # Errors
    /// Returns error only if `hash` is not a bcrypt hash
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        verify(password, hash).map_err(PasswordError::MalformedHash)
    }
}
