//! Password hashing with argon2id
//!
//! Hashes are salted per call, so the same plaintext never produces the same
//! output twice. Verification is constant-time inside the PHC verifier.
//! Plaintext passwords are never logged or returned from this module.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as PhcError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{KeygateError, Result};

/// Hashes a plaintext password into a PHC-format string
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| KeygateError::HashError(format!("Failed to hash password: {}", e)))
}

/// Verifies a plaintext password against a stored PHC-format hash
///
/// A mismatch is `Ok(false)`; an unparseable or corrupt hash is an error,
/// never treated as a mismatch.
pub fn verify_password(plaintext: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| KeygateError::HashError(format!("Malformed password hash: {}", e)))?;

    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PhcError::Password) => Ok(false),
        Err(e) => Err(KeygateError::HashError(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}
