//! Frontend module for the `MindCare` client.

pub mod app;
pub mod services;

pub use app::App;
