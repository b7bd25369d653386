//! Error message constants used throughout the application.

// Authentication errors
pub const ERR_AUTH_REQUIRED: &str = "Authentication required";
pub const ERR_INVALID_AUTH_HEADER: &str = "Missing or invalid authorization header";
pub const ERR_INVALID_TOKEN: &str = "Invalid or expired token";

// User errors
pub const ERR_USER_NOT_FOUND: &str = "User not found";
pub const ERR_USERNAME_EXISTS: &str = "Username already taken";

// Relationship errors
pub const ERR_FOLLOWER_NOT_FOUND: &str = "Follower not found";
pub const ERR_SELF_FOLLOW: &str = "User cannot follow itself";
pub const ERR_ALREADY_FOLLOWING: &str = "Already following the user";
pub const ERR_NOT_FOLLOWING: &str = "Follower not found in the followers list";

// Thread errors
pub const ERR_THREAD_NOT_FOUND: &str = "Thread not found";
pub const ERR_INVALID_THREAD_ID: &str = "Invalid thread ID format";

// Storage errors
pub const ERR_DB_CONNECTION_FAILED: &str = "MongoDB connection failed";
pub const ERR_DB_NOT_CONNECTED: &str = "Database is not connected";

// Operation prefixes for wrapped persistence failures
pub const ERR_UPSERT_USER: &str = "Failed to create/update user";
pub const ERR_FETCH_USER: &str = "Failed to fetch user";
pub const ERR_FETCH_USERS: &str = "Failed to fetch users";
pub const ERR_FETCH_USER_POSTS: &str = "Unable to fetch user posts";
pub const ERR_FETCH_ACTIVITY: &str = "Failed to fetch activity";
pub const ERR_FOLLOW: &str = "Error in following the user";
pub const ERR_UNFOLLOW: &str = "Error in unfollowing the user";
pub const ERR_FETCH_FOLLOWERS: &str = "Error in fetching followers";
pub const ERR_FETCH_FOLLOWER_DETAILS: &str = "Error in fetching followers details";
pub const ERR_CREATE_THREAD: &str = "Failed to create thread";
pub const ERR_ADD_REPLY: &str = "Failed to add reply to thread";
pub const ERR_FETCH_THREAD: &str = "Failed to fetch thread";
