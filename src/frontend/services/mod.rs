//! Frontend services for session state and data synchronisation.

pub mod appointments;
pub mod context;
pub mod dashboard;
pub mod forum;
pub mod medications;
pub mod profile;
pub mod resource;
