//! Request handlers for the HTTP API

pub mod auth;

// Re-export the route builder
pub use auth::routes;
