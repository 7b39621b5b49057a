//! MindCare client.
//!
//! The [`SessionGuard`](frontend::services::context::SessionGuard) decides what a user
//! may see; [`ResourceScreen`](frontend::services::resource::ResourceScreen) keeps each
//! screen's copy of a server collection in step with the server by refetching after
//! every write.

pub mod backend;
pub mod frontend;
pub mod utils;

pub use backend::api::models;
pub use backend::utils::route::{Admission, Route};
pub use frontend::App;
pub use frontend::services::context::{SessionGuard, SessionState};
pub use utils::{ApiError, Result};
