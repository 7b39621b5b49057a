//! MindCare REST API.

pub mod client;
pub mod models;
pub mod transport;

pub use client::Api;
pub use transport::{ApiRequest, HttpTransport, Method, Transport};
