//! Thread-related request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Request payload for posting a thread or a reply
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ThreadRequest {
    /// Body text (minimum 3 characters)
    #[validate(length(min = 3, message = "Thread must be at least 3 characters"))]
    #[schema(example = "Shipping the follower graph today")]
    pub text: String,
}
