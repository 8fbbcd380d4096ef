//! Authentication module: password hashing, token issuance and the login flow

pub mod password;
pub mod service;
pub mod token;

// Re-export main components
pub use service::{AuthService, Identity};
pub use token::{extract_bearer_token, AccessToken, Claims, TokenIssuer};
