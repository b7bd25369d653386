use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User document stored in MongoDB
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    /// External identity id issued by the identity provider.
    #[serde(rename = "id")]
    pub identity_id: String,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub onboarded: bool,
    /// Identity ids of the accounts following this user, in follow order.
    #[serde(default)]
    pub followers: Vec<String>,
    /// Top-level threads authored by this user.
    #[serde(default)]
    pub threads: Vec<ObjectId>,
    pub created_at: mongodb::bson::DateTime,
    pub updated_at: mongodb::bson::DateTime,
}

impl User {
    pub fn is_followed_by(&self, identity_id: &str) -> bool {
        self.followers.iter().any(|f| f == identity_id)
    }
}

/// Profile fields written on onboarding and on every profile edit.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub identity_id: String,
    pub username: String,
    pub name: String,
    pub bio: String,
    pub image: String,
}

/// Sort direction for user listings, applied to `created_at`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// MongoDB sort direction
    pub fn direction(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

/// Parameters of a paginated user search.
#[derive(Debug, Clone)]
pub struct UserQuery {
    /// The requesting user, always excluded from results.
    pub exclude_identity: String,
    /// Case-insensitive literal substring matched against username or name.
    pub search: Option<String>,
    pub skip: u64,
    pub limit: u64,
    pub sort: SortOrder,
}

/// Result of a conditional follower-set write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerUpdate {
    /// The set changed.
    Applied,
    /// No user with the target identity id exists.
    TargetMissing,
    /// The target exists but the set already had (add) or lacked (remove) the member.
    Unchanged,
}
