//! In-memory `UserStore` and `ThreadStore` for tests.
//!
//! Mirrors the MongoDB repositories' semantics: conditional follower writes,
//! case-insensitive literal search, newest-first thread listings.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::constants::{CODE_PERSISTENCE_FAILED, CODE_USERNAME_EXISTS, ERR_USERNAME_EXISTS};
use crate::errors::ApiError;
use crate::models::{FollowerUpdate, ProfileUpdate, SortOrder, Thread, User, UserQuery};

use super::{ThreadStore, UserStore};

const EPOCH_MILLIS: i64 = 1_700_000_000_000;

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    threads: RwLock<Vec<Thread>>,
    clock: AtomicI64,
    failing: bool,
    fail_push_child: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails like a dropped connection.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Make every later `push_child` fail, as if the link write was lost.
    pub fn fail_push_child(&self) {
        self.fail_push_child.store(true, Ordering::SeqCst);
    }

    /// Strictly increasing timestamps so ordering is deterministic.
    fn tick(&self) -> mongodb::bson::DateTime {
        let step = self.clock.fetch_add(1, Ordering::SeqCst);
        mongodb::bson::DateTime::from_millis(EPOCH_MILLIS + step)
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.failing {
            return Err(ApiError::InternalServerError {
                code: CODE_PERSISTENCE_FAILED.to_string(),
                message: "connection reset by peer".to_string(),
            });
        }
        Ok(())
    }
}

fn matches_search(user: &User, search: &str) -> bool {
    let needle = search.to_lowercase();
    user.username.to_lowercase().contains(&needle) || user.name.to_lowercase().contains(&needle)
}

fn newest_first(threads: &mut [Thread]) {
    threads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_indexes(&self) -> Result<(), ApiError> {
        self.check()
    }

    async fn upsert_profile(&self, profile: &ProfileUpdate) -> Result<User, ApiError> {
        self.check()?;
        let now = self.tick();
        let mut users = self.users.write().await;

        // Same constraint as the unique username index.
        if users
            .iter()
            .any(|u| u.username == profile.username && u.identity_id != profile.identity_id)
        {
            return Err(ApiError::Conflict {
                code: CODE_USERNAME_EXISTS.to_string(),
                message: ERR_USERNAME_EXISTS.to_string(),
            });
        }

        if let Some(user) = users
            .iter_mut()
            .find(|u| u.identity_id == profile.identity_id)
        {
            user.username = profile.username.clone();
            user.name = profile.name.clone();
            user.bio = profile.bio.clone();
            user.image = profile.image.clone();
            user.onboarded = true;
            user.updated_at = now;
            return Ok(user.clone());
        }

        let user = User {
            object_id: Some(ObjectId::new()),
            identity_id: profile.identity_id.clone(),
            username: profile.username.clone(),
            name: profile.name.clone(),
            bio: profile.bio.clone(),
            image: profile.image.clone(),
            onboarded: true,
            followers: Vec::new(),
            threads: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_identity(&self, identity_id: &str) -> Result<Option<User>, ApiError> {
        self.check()?;
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.identity_id == identity_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        self.check()?;
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_identities(&self, identity_ids: &[String]) -> Result<Vec<User>, ApiError> {
        self.check()?;
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| identity_ids.contains(&u.identity_id))
            .cloned()
            .collect())
    }

    async fn find_by_object_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, ApiError> {
        self.check()?;
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| u.object_id.is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn search(&self, query: &UserQuery) -> Result<(Vec<User>, u64), ApiError> {
        self.check()?;
        let users = self.users.read().await;
        let search = query.search.as_deref().map(str::trim).unwrap_or_default();

        let mut matching: Vec<User> = users
            .iter()
            .filter(|u| u.identity_id != query.exclude_identity)
            .filter(|u| search.is_empty() || matches_search(u, search))
            .cloned()
            .collect();

        matching.sort_by(|a, b| match query.sort {
            SortOrder::Asc => a.created_at.cmp(&b.created_at),
            SortOrder::Desc => b.created_at.cmp(&a.created_at),
        });

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(query.skip).unwrap_or(usize::MAX))
            .take(query.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn exists(&self, identity_id: &str) -> Result<bool, ApiError> {
        Ok(self.find_by_identity(identity_id).await?.is_some())
    }

    async fn add_follower(
        &self,
        target: &str,
        follower: &str,
    ) -> Result<FollowerUpdate, ApiError> {
        self.check()?;
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.identity_id == target) else {
            return Ok(FollowerUpdate::TargetMissing);
        };

        if user.is_followed_by(follower) {
            return Ok(FollowerUpdate::Unchanged);
        }
        user.followers.push(follower.to_string());
        Ok(FollowerUpdate::Applied)
    }

    async fn remove_follower(
        &self,
        target: &str,
        follower: &str,
    ) -> Result<FollowerUpdate, ApiError> {
        self.check()?;
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.identity_id == target) else {
            return Ok(FollowerUpdate::TargetMissing);
        };

        if !user.is_followed_by(follower) {
            return Ok(FollowerUpdate::Unchanged);
        }
        user.followers.retain(|f| f != follower);
        Ok(FollowerUpdate::Applied)
    }

    async fn push_thread(&self, user: ObjectId, thread: ObjectId) -> Result<(), ApiError> {
        self.check()?;
        let mut users = self.users.write().await;
        if let Some(u) = users.iter_mut().find(|u| u.object_id == Some(user)) {
            u.threads.push(thread);
        }
        Ok(())
    }
}

#[async_trait]
impl ThreadStore for MemoryStore {
    async fn create_indexes(&self) -> Result<(), ApiError> {
        self.check()
    }

    async fn insert(&self, thread: &Thread) -> Result<ObjectId, ApiError> {
        self.check()?;
        let id = ObjectId::new();
        let stored = Thread {
            id: Some(id),
            created_at: self.tick(),
            ..thread.clone()
        };
        self.threads.write().await.push(stored);
        Ok(id)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Thread>, ApiError> {
        self.check()?;
        let threads = self.threads.read().await;
        Ok(threads.iter().find(|t| t.id == Some(id)).cloned())
    }

    async fn delete(&self, id: ObjectId) -> Result<(), ApiError> {
        self.check()?;
        self.threads.write().await.retain(|t| t.id != Some(id));
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Thread>, ApiError> {
        self.check()?;
        let threads = self.threads.read().await;
        let mut found: Vec<Thread> = threads
            .iter()
            .filter(|t| t.id.is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    async fn find_by_author(&self, author: ObjectId) -> Result<Vec<Thread>, ApiError> {
        self.check()?;
        let threads = self.threads.read().await;
        let mut found: Vec<Thread> = threads
            .iter()
            .filter(|t| t.author == author)
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }

    async fn find_by_ids_excluding_author(
        &self,
        ids: &[ObjectId],
        author: ObjectId,
    ) -> Result<Vec<Thread>, ApiError> {
        let mut found = ThreadStore::find_by_ids(self, ids).await?;
        found.retain(|t| t.author != author);
        Ok(found)
    }

    async fn push_child(&self, parent: ObjectId, child: ObjectId) -> Result<bool, ApiError> {
        self.check()?;
        if self.fail_push_child.load(Ordering::SeqCst) {
            return Err(ApiError::InternalServerError {
                code: CODE_PERSISTENCE_FAILED.to_string(),
                message: "connection reset by peer".to_string(),
            });
        }
        let mut threads = self.threads.write().await;
        match threads.iter_mut().find(|t| t.id == Some(parent)) {
            Some(thread) => {
                thread.children.push(child);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
