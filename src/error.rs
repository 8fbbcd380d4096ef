use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum KeygateError {
    // Credential errors (both surface as a generic 401 at the HTTP boundary)
    UserNotFound(String),
    BadCredentials,

    // Token errors
    TokenInvalid,
    TokenExpired,

    // Storage errors
    StorageError(String),
    StorageTimeout,

    // Registration errors
    UserExists(String),

    // Password hashing errors
    HashError(String),

    // Auth machinery errors (token encoding, malformed claims)
    AuthError(String),

    // Input validation errors
    ValidationError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for KeygateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserNotFound(username) => write!(f, "User not found: {}", username),
            Self::BadCredentials => write!(f, "Bad credentials"),
            Self::TokenInvalid => write!(f, "Token is invalid"),
            Self::TokenExpired => write!(f, "Token has expired"),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::StorageTimeout => write!(f, "Storage lookup timed out"),
            Self::UserExists(username) => write!(f, "Username already taken: {}", username),
            Self::HashError(msg) => write!(f, "Password hashing error: {}", msg),
            Self::AuthError(msg) => write!(f, "Authentication error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for KeygateError {}

// Generic result type for Keygate
pub type Result<T> = std::result::Result<T, KeygateError>;
