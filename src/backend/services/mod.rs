//! Core services.

pub mod credentials;

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
