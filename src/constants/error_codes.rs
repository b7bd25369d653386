//! Error code constants for API responses.
//!
//! These codes provide a machine-readable identifier for each error type,
//! making it easier for API clients to handle errors programmatically.

// Validation errors
pub const CODE_VALIDATION_FAILED: &str = "VALIDATION_FAILED";

// Authentication errors
pub const CODE_AUTH_REQUIRED: &str = "AUTH_REQUIRED";
pub const CODE_INVALID_TOKEN: &str = "INVALID_TOKEN";

// User errors
pub const CODE_USER_NOT_FOUND: &str = "USER_NOT_FOUND";
pub const CODE_USERNAME_EXISTS: &str = "USERNAME_EXISTS";

// Relationship errors
pub const CODE_FOLLOWER_NOT_FOUND: &str = "FOLLOWER_NOT_FOUND";
pub const CODE_SELF_FOLLOW: &str = "SELF_FOLLOW";
pub const CODE_ALREADY_FOLLOWING: &str = "ALREADY_FOLLOWING";
pub const CODE_NOT_FOLLOWING: &str = "NOT_FOLLOWING";

// Thread errors
pub const CODE_THREAD_NOT_FOUND: &str = "THREAD_NOT_FOUND";
pub const CODE_INVALID_THREAD_ID: &str = "INVALID_THREAD_ID";

// Storage errors
pub const CODE_DB_CONNECTION_FAILED: &str = "DB_CONNECTION_FAILED";
pub const CODE_DB_NOT_CONNECTED: &str = "DB_NOT_CONNECTED";
pub const CODE_PERSISTENCE_FAILED: &str = "PERSISTENCE_FAILED";
