//! User service: onboarding, directory search, posts, activity and the follower graph.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use mongodb::bson::oid::ObjectId;

use crate::constants::{
    CODE_ALREADY_FOLLOWING, CODE_FOLLOWER_NOT_FOUND, CODE_NOT_FOLLOWING, CODE_SELF_FOLLOW,
    CODE_USERNAME_EXISTS, CODE_USER_NOT_FOUND, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE,
    ERR_ALREADY_FOLLOWING, ERR_FETCH_ACTIVITY, ERR_FETCH_FOLLOWERS, ERR_FETCH_FOLLOWER_DETAILS,
    ERR_FETCH_USER, ERR_FETCH_USERS, ERR_FETCH_USER_POSTS, ERR_FOLLOWER_NOT_FOUND, ERR_FOLLOW,
    ERR_NOT_FOLLOWING, ERR_SELF_FOLLOW, ERR_UNFOLLOW, ERR_UPSERT_USER, ERR_USERNAME_EXISTS,
    ERR_USER_NOT_FOUND, MAX_PAGE_SIZE,
};
use crate::errors::ApiError;
use crate::models::{
    AuthorSummary, FollowerDetail, FollowerUpdate, ProfileUpdate, ReplyResponse, SortOrder,
    ThreadResponse, User, UserPage, UserPostsResponse, UserQuery, UserResponse,
};
use crate::repositories::{ThreadStore, UserStore};
use crate::utils::mask_username;

const MAX_SKIP: u64 = i64::MAX as u64;

/// Page the profile editor submits from; edits made there ask the caller to refresh it.
pub const PROFILE_EDIT_PATH: &str = "/profile/edit";

/// Onboarding or profile-edit input.
#[derive(Debug, Clone)]
pub struct UpsertProfile {
    pub identity_id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub image: String,
    pub path: Option<String>,
}

/// Directory listing input. Missing values fall back to the pagination defaults.
#[derive(Debug, Clone, Default)]
pub struct ListUsers {
    pub requester_id: String,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub sort: SortOrder,
}

fn user_not_found() -> ApiError {
    ApiError::NotFound {
        code: CODE_USER_NOT_FOUND.to_string(),
        message: ERR_USER_NOT_FOUND.to_string(),
    }
}

fn follower_not_found() -> ApiError {
    ApiError::NotFound {
        code: CODE_FOLLOWER_NOT_FOUND.to_string(),
        message: ERR_FOLLOWER_NOT_FOUND.to_string(),
    }
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    threads: Arc<dyn ThreadStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, threads: Arc<dyn ThreadStore>) -> Self {
        Self { users, threads }
    }

    /// Create or update the caller's profile and mark them onboarded.
    ///
    /// Returns the stored user and, for edits made from the profile editor,
    /// the path the caller should refresh.
    pub async fn upsert_profile(
        &self,
        req: UpsertProfile,
    ) -> Result<(User, Option<String>), ApiError> {
        let username = req.username.to_lowercase();
        info!(
            "Upserting profile for user {} ({})",
            req.identity_id,
            mask_username(&username)
        );

        if let Some(owner) = self
            .users
            .find_by_username(&username)
            .await
            .map_err(|e| e.context(ERR_UPSERT_USER))?
        {
            if owner.identity_id != req.identity_id {
                warn!(
                    "Profile update failed: username {} already taken",
                    mask_username(&username)
                );
                return Err(ApiError::Conflict {
                    code: CODE_USERNAME_EXISTS.to_string(),
                    message: ERR_USERNAME_EXISTS.to_string(),
                });
            }
        }

        let user = self
            .users
            .upsert_profile(&ProfileUpdate {
                identity_id: req.identity_id,
                username,
                name: req.name,
                bio: req.bio,
                image: req.image,
            })
            .await
            .map_err(|e| e.context(ERR_UPSERT_USER))?;

        let revalidate = req.path.filter(|path| path == PROFILE_EDIT_PATH);
        Ok((user, revalidate))
    }

    pub async fn get_user_by_identity(&self, identity_id: &str) -> Result<Option<User>, ApiError> {
        debug!("Fetching user with identity: {}", identity_id);
        self.users
            .find_by_identity(identity_id)
            .await
            .map_err(|e| e.context(ERR_FETCH_USER))
    }

    /// One page of the user directory, never including the requester.
    pub async fn list_users(&self, req: ListUsers) -> Result<UserPage, ApiError> {
        let page = req.page.unwrap_or(DEFAULT_PAGE_NUMBER).max(1);
        let per_page = req
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        // Pages far past the end saturate; the store takes a signed offset.
        let skip = (page - 1).saturating_mul(per_page).min(MAX_SKIP);

        let (users, total) = self
            .users
            .search(&UserQuery {
                exclude_identity: req.requester_id,
                search: req.search,
                skip,
                limit: per_page,
                sort: req.sort,
            })
            .await
            .map_err(|e| e.context(ERR_FETCH_USERS))?;

        let is_next = total > skip.saturating_add(users.len() as u64);
        debug!(
            "Listed {} of {} users (page {}, next: {})",
            users.len(),
            total,
            page,
            is_next
        );

        Ok(UserPage {
            users: users.into_iter().map(UserResponse::from).collect(),
            page,
            per_page,
            is_next,
        })
    }

    /// The user with their threads, each thread's replies and each reply's author.
    pub async fn get_user_posts(
        &self,
        identity_id: &str,
    ) -> Result<Option<UserPostsResponse>, ApiError> {
        self.load_user_posts(identity_id)
            .await
            .map_err(|e| e.context(ERR_FETCH_USER_POSTS))
    }

    async fn load_user_posts(
        &self,
        identity_id: &str,
    ) -> Result<Option<UserPostsResponse>, ApiError> {
        let Some(user) = self.users.find_by_identity(identity_id).await? else {
            return Ok(None);
        };

        let threads = self.threads.find_by_ids(&user.threads).await?;
        let reply_ids: Vec<ObjectId> = threads
            .iter()
            .flat_map(|t| t.children.iter().copied())
            .collect();
        let replies = self.threads.find_by_ids(&reply_ids).await?;

        let author_ids: Vec<ObjectId> = replies.iter().map(|r| r.author).collect();
        let authors = self.author_summaries(&author_ids).await?;

        let mut replies_by_id: HashMap<ObjectId, _> = replies
            .into_iter()
            .filter_map(|r| r.id.map(|id| (id, r)))
            .collect();

        let owner = AuthorSummary::from(&user);
        let threads = threads
            .into_iter()
            .map(|thread| {
                let replies = thread
                    .children
                    .iter()
                    .filter_map(|child| replies_by_id.remove(child))
                    .map(|reply| {
                        let author = authors.get(&reply.author).cloned();
                        ReplyResponse::new(reply, author)
                    })
                    .collect();
                let author = (Some(thread.author) == user.object_id).then(|| owner.clone());
                ThreadResponse::new(thread, author, replies)
            })
            .collect();

        Ok(Some(UserPostsResponse {
            user: user.into(),
            threads,
        }))
    }

    /// Replies other users left on the user's threads, newest first.
    pub async fn get_activity(&self, identity_id: &str) -> Result<Vec<ReplyResponse>, ApiError> {
        self.load_activity(identity_id)
            .await
            .map_err(|e| e.context(ERR_FETCH_ACTIVITY))
    }

    async fn load_activity(&self, identity_id: &str) -> Result<Vec<ReplyResponse>, ApiError> {
        let user = self
            .users
            .find_by_identity(identity_id)
            .await?
            .ok_or_else(user_not_found)?;
        let Some(author) = user.object_id else {
            return Ok(Vec::new());
        };

        let child_ids: Vec<ObjectId> = self
            .threads
            .find_by_author(author)
            .await?
            .into_iter()
            .flat_map(|t| t.children)
            .collect();

        let replies = self
            .threads
            .find_by_ids_excluding_author(&child_ids, author)
            .await?;

        let author_ids: Vec<ObjectId> = replies.iter().map(|r| r.author).collect();
        let authors = self.author_summaries(&author_ids).await?;

        debug!("Found {} activity entries for {}", replies.len(), identity_id);
        Ok(replies
            .into_iter()
            .map(|reply| {
                let author = authors.get(&reply.author).cloned();
                ReplyResponse::new(reply, author)
            })
            .collect())
    }

    /// Make `follower_id` follow `target_id`.
    ///
    /// The follower set is only touched through a single conditional write,
    /// so concurrent follows of the same pair cannot insert a duplicate.
    pub async fn follow(&self, target_id: &str, follower_id: &str) -> Result<(), ApiError> {
        info!("User {} following user {}", follower_id, target_id);

        if target_id == follower_id {
            warn!("Follow rejected: user {} attempted to follow itself", target_id);
            return Err(ApiError::BadRequest {
                code: CODE_SELF_FOLLOW.to_string(),
                message: ERR_SELF_FOLLOW.to_string(),
            });
        }

        self.require_follower(follower_id)
            .await
            .map_err(|e| e.context(ERR_FOLLOW))?;

        let outcome = self
            .users
            .add_follower(target_id, follower_id)
            .await
            .map_err(|e| e.context(ERR_FOLLOW))?;

        match outcome {
            FollowerUpdate::Applied => {
                info!("User {} now follows {}", follower_id, target_id);
                Ok(())
            }
            FollowerUpdate::TargetMissing => {
                warn!("Follow failed: user {} not found", target_id);
                Err(user_not_found())
            }
            FollowerUpdate::Unchanged => {
                warn!("Follow failed: {} already follows {}", follower_id, target_id);
                Err(ApiError::Conflict {
                    code: CODE_ALREADY_FOLLOWING.to_string(),
                    message: ERR_ALREADY_FOLLOWING.to_string(),
                })
            }
        }
    }

    /// Remove `follower_id` from `target_id`'s followers.
    pub async fn unfollow(&self, target_id: &str, follower_id: &str) -> Result<(), ApiError> {
        info!("User {} unfollowing user {}", follower_id, target_id);

        self.require_follower(follower_id)
            .await
            .map_err(|e| e.context(ERR_UNFOLLOW))?;

        let outcome = self
            .users
            .remove_follower(target_id, follower_id)
            .await
            .map_err(|e| e.context(ERR_UNFOLLOW))?;

        match outcome {
            FollowerUpdate::Applied => {
                info!("User {} no longer follows {}", follower_id, target_id);
                Ok(())
            }
            FollowerUpdate::TargetMissing => {
                warn!("Unfollow failed: user {} not found", target_id);
                Err(user_not_found())
            }
            FollowerUpdate::Unchanged => {
                warn!("Unfollow failed: {} does not follow {}", follower_id, target_id);
                Err(ApiError::Conflict {
                    code: CODE_NOT_FOLLOWING.to_string(),
                    message: ERR_NOT_FOLLOWING.to_string(),
                })
            }
        }
    }

    /// Full user records of the target's followers, in the order they followed.
    pub async fn list_followers(&self, target_id: &str) -> Result<Vec<User>, ApiError> {
        let target = self
            .users
            .find_by_identity(target_id)
            .await
            .map_err(|e| e.context(ERR_FETCH_FOLLOWERS))?
            .ok_or_else(user_not_found)?;

        let mut by_identity: HashMap<String, User> = self
            .users
            .find_by_identities(&target.followers)
            .await
            .map_err(|e| e.context(ERR_FETCH_FOLLOWERS))?
            .into_iter()
            .map(|u| (u.identity_id.clone(), u))
            .collect();

        let mut followers = Vec::with_capacity(target.followers.len());
        for follower_id in &target.followers {
            match by_identity.remove(follower_id) {
                Some(user) => followers.push(user),
                None => warn!(
                    "Follower {} of user {} has no user record",
                    follower_id, target_id
                ),
            }
        }

        Ok(followers)
    }

    /// Followers of the target with their own follower counts and whether the
    /// target follows them back.
    pub async fn list_follower_details(
        &self,
        target_id: &str,
    ) -> Result<Vec<FollowerDetail>, ApiError> {
        let target = self
            .users
            .find_by_identity(target_id)
            .await
            .map_err(|e| e.context(ERR_FETCH_FOLLOWER_DETAILS))?
            .ok_or_else(user_not_found)?;

        let users = self
            .users
            .find_by_identities(&target.followers)
            .await
            .map_err(|e| e.context(ERR_FETCH_FOLLOWER_DETAILS))?;

        Ok(users
            .into_iter()
            .map(|user| FollowerDetail {
                follows_back: user.is_followed_by(target_id),
                followers_count: user.followers.len(),
                id: user.identity_id,
                username: user.username,
                name: user.name,
                image: user.image,
            })
            .collect())
    }

    async fn require_follower(&self, follower_id: &str) -> Result<(), ApiError> {
        if self.users.exists(follower_id).await? {
            Ok(())
        } else {
            warn!("Follower {} not found", follower_id);
            Err(follower_not_found())
        }
    }

    async fn author_summaries(
        &self,
        ids: &[ObjectId],
    ) -> Result<HashMap<ObjectId, AuthorSummary>, ApiError> {
        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();

        Ok(self
            .users
            .find_by_object_ids(&unique)
            .await?
            .iter()
            .filter_map(|u| u.object_id.map(|id| (id, AuthorSummary::from(u))))
            .collect())
    }
}
