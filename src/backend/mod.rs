//! Backend of the application.

pub mod api;
pub mod services;
pub mod utils;

pub use api::Api;
