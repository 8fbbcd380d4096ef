//! Keygate - a credential issuance and validation service
//!
//! This library provides username/password login producing a signed,
//! time-bounded bearer token, plus token validation for subsequent requests.

pub mod auth;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod security_logger;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
