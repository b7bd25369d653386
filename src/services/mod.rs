//! Services organized by domain concern.

pub mod thread_service;
pub mod user_service;

pub use thread_service::ThreadService;
pub use user_service::{ListUsers, UpsertProfile, UserService};
