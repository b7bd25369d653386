//! User-related response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::to_utc;
use crate::models::{ThreadResponse, User};

/// User data returned in API responses
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UserResponse {
    /// External identity id
    #[schema(example = "user_2NNEqL2nrIRdJ194ndJqAHwEfxC")]
    pub id: String,
    /// Lowercase username
    #[schema(example = "janedoe")]
    pub username: String,
    /// Display name
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub bio: String,
    /// Avatar image URL
    pub image: String,
    /// Whether the user completed onboarding
    pub onboarded: bool,
    /// Identity ids of the user's followers
    pub followers: Vec<String>,
    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.identity_id,
            username: user.username,
            name: user.name,
            bio: user.bio,
            image: user.image,
            onboarded: user.onboarded,
            followers: user.followers,
            created_at: to_utc(user.created_at),
        }
    }
}

/// Minimal author details attached to threads and replies
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    pub image: String,
}

impl From<&User> for AuthorSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.identity_id.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

/// A follower with relationship details relative to the followed user
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct FollowerDetail {
    pub id: String,
    pub username: String,
    pub name: String,
    pub image: String,
    /// How many accounts follow this follower
    pub followers_count: usize,
    /// Whether the followed user follows this follower back
    pub follows_back: bool,
}

/// Result of onboarding or a profile edit
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileSaved {
    pub user: UserResponse,
    /// Page the caller should refresh, when the edit came from the profile editor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revalidate_path: Option<String>,
}

/// A user together with their threads and each thread's replies
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPostsResponse {
    pub user: UserResponse,
    pub threads: Vec<ThreadResponse>,
}
