use std::collections::HashMap;

use async_trait::async_trait;

use super::{CredentialStore, Identity, StoreError};

/// Fixed set of identities keyed by username
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    users: HashMap<String, Identity>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.users.insert(identity.username.clone(), identity);
        self
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.users.get(username).cloned())
    }
}
