//! Response models for API endpoints.

pub mod api;
pub mod pagination;
pub mod thread;
pub mod user;

pub use api::*;
pub use pagination::*;
pub use thread::*;
pub use user::*;

use chrono::{DateTime, Utc};

/// Convert a stored BSON timestamp into the API's UTC representation.
pub(crate) fn to_utc(dt: mongodb::bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}
