//! Repository layer for database operations.
//!
//! Services talk to storage through the `UserStore` and `ThreadStore` traits.
//! The MongoDB implementations are used by the server; the in-memory
//! implementation backs the unit tests.

pub mod thread_repository;
pub mod user_repository;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::errors::ApiError;
use crate::models::{FollowerUpdate, ProfileUpdate, Thread, User, UserQuery};

pub use thread_repository::ThreadRepository;
pub use user_repository::UserRepository;

/// Document operations on the `users` collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_indexes(&self) -> Result<(), ApiError>;

    /// Insert the profile if no user has this identity id, otherwise overwrite
    /// its profile fields. Either way the user ends up onboarded.
    async fn upsert_profile(&self, profile: &ProfileUpdate) -> Result<User, ApiError>;

    async fn find_by_identity(&self, identity_id: &str) -> Result<Option<User>, ApiError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;

    /// Users whose identity id is in `identity_ids`, oldest first.
    async fn find_by_identities(&self, identity_ids: &[String]) -> Result<Vec<User>, ApiError>;

    async fn find_by_object_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, ApiError>;

    /// One page of matching users plus the total number of matches.
    async fn search(&self, query: &UserQuery) -> Result<(Vec<User>, u64), ApiError>;

    async fn exists(&self, identity_id: &str) -> Result<bool, ApiError>;

    /// Append `follower` to the target's follower set if it is absent, atomically.
    async fn add_follower(&self, target: &str, follower: &str)
        -> Result<FollowerUpdate, ApiError>;

    /// Remove `follower` from the target's follower set if it is present, atomically.
    async fn remove_follower(
        &self,
        target: &str,
        follower: &str,
    ) -> Result<FollowerUpdate, ApiError>;

    async fn push_thread(&self, user: ObjectId, thread: ObjectId) -> Result<(), ApiError>;
}

/// Document operations on the `threads` collection.
#[async_trait]
pub trait ThreadStore: Send + Sync {
    async fn create_indexes(&self) -> Result<(), ApiError>;

    async fn insert(&self, thread: &Thread) -> Result<ObjectId, ApiError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Thread>, ApiError>;

    async fn delete(&self, id: ObjectId) -> Result<(), ApiError>;

    /// Threads with the given ids, newest first.
    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Thread>, ApiError>;

    /// Threads authored by `author`, newest first.
    async fn find_by_author(&self, author: ObjectId) -> Result<Vec<Thread>, ApiError>;

    /// Threads with the given ids not authored by `author`, newest first.
    async fn find_by_ids_excluding_author(
        &self,
        ids: &[ObjectId],
        author: ObjectId,
    ) -> Result<Vec<Thread>, ApiError>;

    /// Append `child` to the parent's replies. Returns false when the parent is gone.
    async fn push_child(&self, parent: ObjectId, child: ObjectId) -> Result<bool, ApiError>;
}
