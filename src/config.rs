//! Server configuration module
//! Handles runtime configuration parameters for the auth service

use crate::constants::{
    DEFAULT_HOST, DEFAULT_LOGIN_FLOOR_MS, DEFAULT_PORT, DEFAULT_STORE_TIMEOUT_MS,
    DEFAULT_TOKEN_TTL_SECS,
};
use crate::error::{KeygateError, Result};
use std::env;
use std::time::Duration;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Upper bound on a single credential store lookup
    pub store_timeout: Duration,
    /// Minimum wall-clock duration of a login attempt (timing uniformity)
    pub login_floor: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        panic!("ServerConfig::default() is not allowed for security reasons. Use ServerConfig::from_env() instead.");
    }
}

impl ServerConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            jwt_secret: "test-jwt-secret-only-for-unit-tests-never-use-in-prod-1".to_string(),
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            login_floor: Duration::from_millis(5),
        }
    }

    /// Validate that the signing secret meets security requirements
    fn validate_jwt_secret(secret: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(KeygateError::ConfigError(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "INSECURE-DEFAULT-FOR-TESTING-ONLY",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(KeygateError::ConfigError(format!(
                    "JWT secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(KeygateError::ConfigError(
                "JWT secret should contain mixed characters (letters, numbers, symbols) for security".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("KEYGATE_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("KEYGATE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        // SECURITY: The signing secret has no default; a missing secret is fatal
        let jwt_secret = env::var("KEYGATE_JWT_SECRET")
            .or_else(|_| env::var("JWT_SECRET"))
            .map_err(|_| {
                KeygateError::ConfigError(
                    "JWT_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let token_ttl_secs = env::var("KEYGATE_TOKEN_TTL_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);

        let store_timeout_ms = env::var("KEYGATE_STORE_TIMEOUT_MS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_STORE_TIMEOUT_MS);

        let login_floor_ms = env::var("KEYGATE_LOGIN_FLOOR_MS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_LOGIN_FLOOR_MS);

        if token_ttl_secs == 0 {
            return Err(KeygateError::ConfigError(
                "KEYGATE_TOKEN_TTL_SECS must be greater than zero".to_string(),
            ));
        }

        Self::validate_jwt_secret(&jwt_secret)?;

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            store_timeout: Duration::from_millis(store_timeout_ms),
            login_floor: Duration::from_millis(login_floor_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "ServerConfig::default() is not allowed for security reasons")]
    fn test_default_panics() {
        let _ = ServerConfig::default();
    }

    #[test]
    fn test_for_testing_works_in_tests() {
        let config = ServerConfig::for_testing();
        assert!(config.jwt_secret.contains("test"));
        assert_eq!(config.token_ttl, Duration::from_secs(DEFAULT_TOKEN_TTL_SECS));
    }

    #[test]
    fn test_weak_secrets_rejected() {
        assert!(ServerConfig::validate_jwt_secret("short").is_err());
        assert!(ServerConfig::validate_jwt_secret(
            "your-secret-key-your-secret-key-your-secret-key"
        )
        .is_err());
        // All-alphabetic secrets lack complexity
        assert!(ServerConfig::validate_jwt_secret(
            "abcdefghijklmnopqrstuvwxyzabcdefghijklmnop"
        )
        .is_err());
        assert!(ServerConfig::validate_jwt_secret(
            "k9!mQ2xR7vT4wZ8pL3nB6cF1hJ5gD0sA-uY"
        )
        .is_ok());
    }

    #[test]
    fn test_from_env_requires_secret() {
        // Clear any existing env vars
        env::remove_var("KEYGATE_JWT_SECRET");
        env::remove_var("JWT_SECRET");

        let result = ServerConfig::from_env();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("JWT_SECRET"));
    }
}
