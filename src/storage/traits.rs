//! Abstract storage interface for credential records
//!
//! The credential store is an external collaborator: its consistency and
//! durability guarantees are its own concern. The service only requires the
//! contract below.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A stored credential record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Internal record identifier
    pub id: String,
    /// Unique login name, immutable once created
    pub username: String,
    pub email: String,
    /// PHC-format argon2 hash, never the plaintext
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Creates a new record with a fresh id and timestamp
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Trait for pluggable credential store backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a record by username
    ///
    /// Absence is `Ok(None)`; a backend failure is `Err` and must never be
    /// collapsed into a not-found result.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>>;

    /// Insert a new record, rejecting duplicate usernames
    async fn create_user(&self, record: UserRecord) -> Result<()>;

    /// Replace the stored password hash for an existing user
    async fn update_password(&self, username: &str, password_hash: String) -> Result<()>;
}
