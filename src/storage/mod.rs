//! Storage backends for credential records

pub mod memory;
pub mod traits;

// Re-export main components
pub use memory::MemoryCredentialStore;
pub use traits::{CredentialStore, UserRecord};
