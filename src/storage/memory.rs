//! In-memory credential store backend

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{KeygateError, Result};
use crate::storage::traits::{CredentialStore, UserRecord};

/// Credential store backed by an in-process map
///
/// Suitable for tests and single-node deployments; a database-backed
/// implementation of [`CredentialStore`] replaces it in production.
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }

    async fn create_user(&self, record: UserRecord) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&record.username) {
            return Err(KeygateError::UserExists(record.username));
        }
        users.insert(record.username.clone(), record);
        Ok(())
    }

    async fn update_password(&self, username: &str, password_hash: String) -> Result<()> {
        let mut users = self.users.write().await;
        match users.get_mut(username) {
            Some(record) => {
                record.password_hash = password_hash;
                Ok(())
            }
            None => Err(KeygateError::UserNotFound(username.to_string())),
        }
    }
}
