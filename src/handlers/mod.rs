//! HTTP request handlers organized by domain.

pub mod thread_handler;
pub mod user_handler;

pub use thread_handler::*;
pub use user_handler::*;
