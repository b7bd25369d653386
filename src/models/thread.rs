use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Thread document stored in MongoDB.
///
/// Replies are threads too: a reply carries its parent's `_id` in `parent_id`
/// and the parent lists the reply in `children`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Thread {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub text: String,
    /// `_id` of the authoring user document.
    pub author: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ObjectId>,
    #[serde(default)]
    pub children: Vec<ObjectId>,
    pub created_at: mongodb::bson::DateTime,
}

impl Thread {
    pub fn new(text: String, author: ObjectId, parent_id: Option<ObjectId>) -> Self {
        Self {
            id: None,
            text,
            author,
            parent_id,
            children: Vec::new(),
            created_at: mongodb::bson::DateTime::now(),
        }
    }
}
