//! Login and token-resolution orchestration
//!
//! The service is stateless and safe to call from any number of concurrent
//! tasks: the only shared state is the read-only signing key and whatever
//! synchronization the credential store does internally.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{AccessToken, TokenIssuer};
use crate::error::{KeygateError, Result};
use crate::security::AuthTimer;
use crate::security_logger::{SecurityEvent, SecurityLogger};
use crate::storage::traits::{CredentialStore, UserRecord};

/// Identity recovered from a validated bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
}

/// Orchestrates credential verification, token issuance and token resolution
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    issuer: TokenIssuer,
    store_timeout: Duration,
    login_floor: Duration,
    /// Verified against when a login names an unknown user, so both failure
    /// paths cost one argon2 verification
    dummy_hash: String,
    logger: Arc<SecurityLogger>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        issuer: TokenIssuer,
        store_timeout: Duration,
        login_floor: Duration,
        logger: Arc<SecurityLogger>,
    ) -> Result<Self> {
        let dummy_hash = hash_password("keygate-timing-equalizer")?;
        Ok(Self {
            store,
            issuer,
            store_timeout,
            login_floor,
            dummy_hash,
            logger,
        })
    }

    /// Verify a username/password pair and issue a bearer token
    ///
    /// An unknown username and a wrong password are indistinguishable to the
    /// caller: both return `BadCredentials` after the same minimum duration
    /// and the same amount of hashing work. Storage failures propagate
    /// distinctly and must never be reported as a credential rejection.
    pub async fn login(&self, username: &str, password: &str) -> Result<AccessToken> {
        let timer = AuthTimer::new(self.login_floor);
        let outcome = self.check_credentials(username, password).await;
        timer.wait().await;

        match outcome {
            Ok(()) => {
                let token = self.issuer.issue(username)?;
                self.logger
                    .log_event(SecurityEvent::AuthenticationSuccess {
                        username: username.to_string(),
                    })
                    .await;
                Ok(token)
            }
            Err(e) => {
                match &e {
                    KeygateError::StorageError(_) | KeygateError::StorageTimeout => {
                        self.logger
                            .log_event(SecurityEvent::StorageFailure {
                                operation: "find_by_username".to_string(),
                                error: e.to_string(),
                            })
                            .await;
                    }
                    _ => {
                        self.logger
                            .log_event(SecurityEvent::AuthenticationFailed {
                                username: Some(username.to_string()),
                                reason: e.to_string(),
                            })
                            .await;
                    }
                }
                Err(e)
            }
        }
    }

    /// Resolve a presented bearer token to the caller's identity
    pub async fn resolve(&self, token: &str) -> Result<Identity> {
        // Reject absurd inputs before handing them to the JWT decoder
        if token.is_empty() || token.len() > 1000 || token.chars().any(|c| c.is_control()) {
            self.logger
                .log_event(SecurityEvent::TokenValidationFailed {
                    reason: "malformed token string".to_string(),
                })
                .await;
            return Err(KeygateError::TokenInvalid);
        }

        match self.issuer.validate(token) {
            Ok(claims) => {
                if claims.sub.is_empty() || claims.sub.len() > 100 {
                    self.logger
                        .log_event(SecurityEvent::TokenValidationFailed {
                            reason: "invalid subject claim".to_string(),
                        })
                        .await;
                    return Err(KeygateError::TokenInvalid);
                }
                Ok(Identity {
                    username: claims.sub,
                })
            }
            Err(e) => {
                self.logger
                    .log_event(SecurityEvent::TokenValidationFailed {
                        reason: e.to_string(),
                    })
                    .await;
                Err(e)
            }
        }
    }

    /// Create a credential record for a new user
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserRecord> {
        validate_username(username)?;
        validate_email(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        let record = UserRecord::new(username.to_string(), email.to_string(), password_hash);

        match timeout(self.store_timeout, self.store.create_user(record.clone())).await {
            Ok(Ok(())) => Ok(record),
            Ok(Err(e)) => {
                if let KeygateError::StorageError(_) = &e {
                    self.logger
                        .log_event(SecurityEvent::StorageFailure {
                            operation: "create_user".to_string(),
                            error: e.to_string(),
                        })
                        .await;
                }
                Err(e)
            }
            Err(_) => Err(KeygateError::StorageTimeout),
        }
    }

    /// Replace a user's password after re-verifying the current one
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        validate_password(new_password)?;
        self.check_credentials(username, current_password).await?;

        let password_hash = hash_password(new_password)?;
        match timeout(
            self.store_timeout,
            self.store.update_password(username, password_hash),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(KeygateError::StorageTimeout),
        }
    }

    /// Single login attempt: lookup, then verify
    ///
    /// Lookup-miss and password-mismatch both come out as `BadCredentials`.
    async fn check_credentials(&self, username: &str, password: &str) -> Result<()> {
        let record = self.lookup(username).await?;

        match record {
            Some(record) => {
                if verify_password(password, &record.password_hash)? {
                    Ok(())
                } else {
                    Err(KeygateError::BadCredentials)
                }
            }
            None => {
                // Burn the same verification cost as the found path
                let _ = verify_password(password, &self.dummy_hash);
                Err(KeygateError::BadCredentials)
            }
        }
    }

    /// Store lookup bounded by the configured timeout
    async fn lookup(&self, username: &str) -> Result<Option<UserRecord>> {
        match timeout(self.store_timeout, self.store.find_by_username(username)).await {
            Ok(result) => result,
            Err(_) => Err(KeygateError::StorageTimeout),
        }
    }
}

fn validate_username(username: &str) -> Result<()> {
    if username.is_empty() || username.len() > 50 {
        return Err(KeygateError::ValidationError(
            "username must be between 1 and 50 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(KeygateError::ValidationError(
            "username may only contain letters, digits, '_', '-' and '.'".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    if email.len() > 254 || !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(KeygateError::ValidationError(
            "email address is not valid".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 || password.len() > 128 {
        return Err(KeygateError::ValidationError(
            "password must be between 8 and 128 characters".to_string(),
        ));
    }
    Ok(())
}
