//! Utility modules for the client backend.
//!
//! Configuration, path management, and the route table.

/// Application configuration.
pub mod config;
/// Path utilities for the application directory.
pub mod paths;
/// Route table and admission rules.
pub mod route;
