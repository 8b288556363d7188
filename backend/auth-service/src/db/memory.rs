use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::CredentialStore;
use crate::error::{AuthError, Result};
use crate::models::User;

/// Process-local credential store keyed by email
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: DashMap<String, User>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        Ok(self.users.get(identifier).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, user: &User) -> Result<()> {
        // Entry API holds the shard lock, so check-and-insert is atomic.
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AuthError::Conflict(format!(
                "email {} is already registered",
                user.email
            ))),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }
}
