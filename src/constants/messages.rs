//! Success message constants used throughout the application.

// Profile messages
pub const MSG_USER_FOUND: &str = "User found";
pub const MSG_USERS_FETCHED: &str = "Users fetched successfully";
pub const MSG_USER_PROFILE_RETRIEVED: &str = "User profile retrieved";
pub const MSG_PROFILE_SAVED: &str = "Profile saved successfully";
pub const MSG_USER_POSTS: &str = "User posts fetched successfully";
pub const MSG_ACTIVITY: &str = "Activity fetched successfully";

// Relationship messages
pub const MSG_FOLLOWER_ADDED: &str = "Follower added successfully";
pub const MSG_FOLLOWER_REMOVED: &str = "Follower removed successfully";
pub const MSG_FOLLOWERS_FETCHED: &str = "Followers fetched successfully";
pub const MSG_FOLLOWER_DETAILS_FETCHED: &str = "Followers details fetched successfully";

// Thread messages
pub const MSG_THREAD_CREATED: &str = "Thread created successfully";
pub const MSG_REPLY_ADDED: &str = "Reply added successfully";
pub const MSG_THREAD_FOUND: &str = "Thread found";
