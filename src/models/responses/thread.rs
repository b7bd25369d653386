//! Thread-related response models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::to_utc;
use crate::models::{AuthorSummary, Thread};

/// A reply, or an activity entry, with its author attached
#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct ReplyResponse {
    #[schema(example = "6531f2a4c1b2a3d4e5f60718")]
    pub id: String,
    pub text: String,
    /// Thread this reply answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Missing when the author record no longer exists
    pub author: Option<AuthorSummary>,
    pub created_at: DateTime<Utc>,
}

impl ReplyResponse {
    pub fn new(thread: Thread, author: Option<AuthorSummary>) -> Self {
        Self {
            id: thread.id.map(|id| id.to_hex()).unwrap_or_default(),
            text: thread.text,
            parent_id: thread.parent_id.map(|id| id.to_hex()),
            author,
            created_at: to_utc(thread.created_at),
        }
    }
}

/// A thread with its author and expanded replies
#[derive(Debug, Serialize, Clone, ToSchema)]
pub struct ThreadResponse {
    #[schema(example = "6531f2a4c1b2a3d4e5f60717")]
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub author: Option<AuthorSummary>,
    pub replies: Vec<ReplyResponse>,
    pub created_at: DateTime<Utc>,
}

impl ThreadResponse {
    pub fn new(thread: Thread, author: Option<AuthorSummary>, replies: Vec<ReplyResponse>) -> Self {
        Self {
            id: thread.id.map(|id| id.to_hex()).unwrap_or_default(),
            text: thread.text,
            parent_id: thread.parent_id.map(|id| id.to_hex()),
            author,
            replies,
            created_at: to_utc(thread.created_at),
        }
    }
}
