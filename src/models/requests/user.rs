//! User-related request models.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::SortOrder;

/// Request payload for onboarding and profile edits
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertProfileRequest {
    /// Avatar image URL
    #[validate(url(message = "Profile photo must be a valid URL"))]
    #[schema(example = "https://img.example.com/avatars/jane.png")]
    pub image: String,
    /// Display name (3-30 characters)
    #[validate(length(min = 3, max = 30, message = "Name must be between 3 and 30 characters"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Unique username (3-30 characters), stored lowercase
    #[validate(length(
        min = 3,
        max = 30,
        message = "Username must be between 3 and 30 characters"
    ))]
    #[schema(example = "janedoe")]
    pub username: String,
    /// Bio (3-1000 characters)
    #[validate(length(min = 3, max = 1000, message = "Bio must be between 3 and 1000 characters"))]
    #[schema(example = "Writing about Rust and databases")]
    pub bio: String,
    /// Page the edit was submitted from; `/profile/edit` asks the caller to refresh it
    #[schema(example = "/profile/edit")]
    pub path: Option<String>,
}

/// Query parameters for the user directory
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserListQuery {
    /// Page number (default: 1)
    pub page: Option<u64>,
    /// Items per page (default: 20, max: 100)
    pub per_page: Option<u64>,
    /// Case-insensitive search over username and name
    pub search: Option<String>,
    /// Sort by creation time: 'asc' or 'desc' (default)
    pub sort: Option<SortOrder>,
}
