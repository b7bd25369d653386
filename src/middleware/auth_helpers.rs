//! Authentication helper functions for handlers.

use actix_web::HttpRequest;
use log::warn;

use crate::constants::{CODE_AUTH_REQUIRED, ERR_AUTH_REQUIRED};
use crate::errors::ApiError;
use crate::models::Claims;

use super::RequestExt;

/// Extract claims from request or return Unauthorized error.
///
/// Use this at the start of any handler that acts on behalf of the caller.
///
/// # Example
/// ```ignore
/// let claims = require_auth(&req)?;
/// user_service.follow(&target_id, &claims.sub).await?;
/// ```
pub fn require_auth(req: &HttpRequest) -> Result<Claims, ApiError> {
    req.get_claims().ok_or_else(|| {
        warn!("Failed to get claims from request");
        ApiError::Unauthorized {
            code: CODE_AUTH_REQUIRED.to_string(),
            message: ERR_AUTH_REQUIRED.to_string(),
        }
    })
}
