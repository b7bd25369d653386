//! Shared helpers.

pub mod log_sanitizer;

pub use log_sanitizer::mask_username;
