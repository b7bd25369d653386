//! Request models for API endpoints.

pub mod thread;
pub mod user;

pub use thread::*;
pub use user::*;
