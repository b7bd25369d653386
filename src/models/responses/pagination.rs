//! Pagination response models.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::UserResponse;

/// One page of the user directory
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPage {
    /// Users on this page
    pub users: Vec<UserResponse>,
    /// Current page number
    pub page: u64,
    /// Items per page
    pub per_page: u64,
    /// Whether more matching users exist past this page
    pub is_next: bool,
}
