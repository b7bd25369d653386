//! User repository for all MongoDB operations related to users.
//!
//! This repository encapsulates all database access logic for the User collection,
//! including the follower set embedded in each user document.

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use log::{debug, info, warn};
use mongodb::bson::{doc, oid::ObjectId, Document, Regex};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::constants::{
    CODE_PERSISTENCE_FAILED, CODE_USERNAME_EXISTS, COLLECTION_USERS, ERR_FETCH_USER,
    ERR_USERNAME_EXISTS,
};
use crate::database::DbConnector;
use crate::errors::ApiError;
use crate::models::{FollowerUpdate, ProfileUpdate, User, UserQuery};

use super::UserStore;

/// MongoDB-backed `UserStore`.
pub struct UserRepository {
    connector: Arc<DbConnector>,
}

impl UserRepository {
    pub fn new(connector: Arc<DbConnector>) -> Self {
        Self { connector }
    }

    async fn collection(&self) -> Result<Collection<User>, ApiError> {
        Ok(self.connector.database().await?.collection(COLLECTION_USERS))
    }

    /// Tell "target missing" apart from "set already in the requested state"
    /// after a conditional update matched nothing.
    async fn classify_unmatched(&self, target: &str) -> Result<FollowerUpdate, ApiError> {
        if self.exists(target).await? {
            Ok(FollowerUpdate::Unchanged)
        } else {
            Ok(FollowerUpdate::TargetMissing)
        }
    }
}

/// Build the directory filter: everyone but the requester, optionally narrowed
/// by a case-insensitive literal match on username or name.
fn search_filter(query: &UserQuery) -> Document {
    let mut filter = doc! { "id": { "$ne": query.exclude_identity.as_str() } };

    if let Some(search) = query.search.as_deref().map(str::trim) {
        if !search.is_empty() {
            let search_regex = Regex {
                pattern: regex::escape(search),
                options: "i".to_string(),
            };
            filter.insert(
                "$or",
                vec![
                    doc! { "username": { "$regex": search_regex.clone() } },
                    doc! { "name": { "$regex": search_regex } },
                ],
            );
        }
    }

    filter
}

const DUPLICATE_KEY: i32 = 11000;

fn duplicate_key_message(err: &mongodb::error::Error) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY => Some(e.message.as_str()),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => {
            Some(e.message.as_str())
        }
        _ => None,
    }
}

/// A concurrent upsert that claimed the same username loses on the unique
/// index; report it like the service's username pre-check does.
fn upsert_error(err: mongodb::error::Error) -> ApiError {
    match duplicate_key_message(&err) {
        Some(message) if message.contains("username") => {
            warn!("Upsert lost username race: {}", message);
            ApiError::Conflict {
                code: CODE_USERNAME_EXISTS.to_string(),
                message: ERR_USERNAME_EXISTS.to_string(),
            }
        }
        _ => err.into(),
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// Create database indexes for commonly queried fields.
    ///
    /// Called once during application startup:
    /// - Unique index on `id` (identity id)
    /// - Unique index on `username`
    /// - Index on `created_at` for directory sorting
    async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for users collection...");

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "username": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder().keys(doc! { "created_at": -1 }).build(),
        ];

        self.collection().await?.create_indexes(indexes).await?;
        info!("User indexes created successfully");
        Ok(())
    }

    async fn upsert_profile(&self, profile: &ProfileUpdate) -> Result<User, ApiError> {
        debug!("Repository: Upserting profile for user: {}", profile.identity_id);
        let now = mongodb::bson::DateTime::now();

        self.collection()
            .await?
            .find_one_and_update(
                doc! { "id": profile.identity_id.as_str() },
                doc! {
                    "$set": {
                        "username": profile.username.as_str(),
                        "name": profile.name.as_str(),
                        "bio": profile.bio.as_str(),
                        "image": profile.image.as_str(),
                        "onboarded": true,
                        "updated_at": now,
                    },
                    "$setOnInsert": {
                        "followers": [],
                        "threads": [],
                        "created_at": now,
                    },
                },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(upsert_error)?
            .ok_or_else(|| ApiError::InternalServerError {
                code: CODE_PERSISTENCE_FAILED.to_string(),
                message: ERR_FETCH_USER.to_string(),
            })
    }

    async fn find_by_identity(&self, identity_id: &str) -> Result<Option<User>, ApiError> {
        debug!("Repository: Finding user by identity: {}", identity_id);
        Ok(self
            .collection()
            .await?
            .find_one(doc! { "id": identity_id })
            .await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .collection()
            .await?
            .find_one(doc! { "username": username })
            .await?)
    }

    async fn find_by_identities(&self, identity_ids: &[String]) -> Result<Vec<User>, ApiError> {
        if identity_ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .collection()
            .await?
            .find(doc! { "id": { "$in": identity_ids.to_vec() } })
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_by_object_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .collection()
            .await?
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn search(&self, query: &UserQuery) -> Result<(Vec<User>, u64), ApiError> {
        let filter = search_filter(query);
        debug!("Repository: Finding users with filter: {:?}", filter);

        let collection = self.collection().await?;
        let total = collection.count_documents(filter.clone()).await?;

        let direction = query.sort.direction();
        let cursor = collection
            .find(filter)
            .sort(doc! { "created_at": direction, "_id": direction })
            .skip(query.skip)
            .limit(query.limit as i64)
            .await?;

        Ok((cursor.try_collect().await?, total))
    }

    async fn exists(&self, identity_id: &str) -> Result<bool, ApiError> {
        let count = self
            .collection()
            .await?
            .count_documents(doc! { "id": identity_id })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn add_follower(
        &self,
        target: &str,
        follower: &str,
    ) -> Result<FollowerUpdate, ApiError> {
        debug!("Repository: Adding follower {} to user {}", follower, target);
        let result = self
            .collection()
            .await?
            .update_one(
                doc! { "id": target, "followers": { "$ne": follower } },
                doc! {
                    "$push": { "followers": follower },
                    "$set": { "updated_at": mongodb::bson::DateTime::now() }
                },
            )
            .await?;

        if result.matched_count == 1 {
            return Ok(FollowerUpdate::Applied);
        }
        self.classify_unmatched(target).await
    }

    async fn remove_follower(
        &self,
        target: &str,
        follower: &str,
    ) -> Result<FollowerUpdate, ApiError> {
        debug!("Repository: Removing follower {} from user {}", follower, target);
        let result = self
            .collection()
            .await?
            .update_one(
                doc! { "id": target, "followers": follower },
                doc! {
                    "$pull": { "followers": follower },
                    "$set": { "updated_at": mongodb::bson::DateTime::now() }
                },
            )
            .await?;

        if result.matched_count == 1 {
            return Ok(FollowerUpdate::Applied);
        }
        self.classify_unmatched(target).await
    }

    async fn push_thread(&self, user: ObjectId, thread: ObjectId) -> Result<(), ApiError> {
        self.collection()
            .await?
            .update_one(
                doc! { "_id": user },
                doc! {
                    "$push": { "threads": thread },
                    "$set": { "updated_at": mongodb::bson::DateTime::now() }
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortOrder;
    use mongodb::error::CommandError;

    fn query(search: Option<&str>) -> UserQuery {
        UserQuery {
            exclude_identity: "u1".to_string(),
            search: search.map(str::to_string),
            skip: 0,
            limit: 20,
            sort: SortOrder::Desc,
        }
    }

    #[test]
    fn test_search_filter_excludes_requester() {
        let filter = search_filter(&query(None));
        assert_eq!(filter, doc! { "id": { "$ne": "u1" } });
    }

    #[test]
    fn test_blank_search_adds_no_clause() {
        let filter = search_filter(&query(Some("   ")));
        assert!(!filter.contains_key("$or"));
    }

    #[test]
    fn test_search_is_escaped_and_case_insensitive() {
        let filter = search_filter(&query(Some(" j.doe ")));
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 2);

        let expected = Regex {
            pattern: r"j\.doe".to_string(),
            options: "i".to_string(),
        };
        assert_eq!(
            clauses[0].as_document().unwrap(),
            &doc! { "username": { "$regex": expected } }
        );
    }

    fn command_error(code: i32, errmsg: &str) -> mongodb::error::Error {
        let err: CommandError = mongodb::bson::from_document(doc! {
            "code": code,
            "codeName": "DuplicateKey",
            "errmsg": errmsg,
        })
        .unwrap();
        ErrorKind::Command(err).into()
    }

    #[test]
    fn test_username_duplicate_key_maps_to_conflict() {
        let err = upsert_error(command_error(
            DUPLICATE_KEY,
            "E11000 duplicate key error collection: threads.users index: username_1 dup key: { username: \"alice\" }",
        ));
        assert_eq!(err.code(), CODE_USERNAME_EXISTS);
    }

    #[test]
    fn test_other_write_errors_stay_persistence_failures() {
        let identity_race = upsert_error(command_error(
            DUPLICATE_KEY,
            "E11000 duplicate key error collection: threads.users index: id_1 dup key: { id: \"u1\" }",
        ));
        assert_eq!(identity_race.code(), CODE_PERSISTENCE_FAILED);

        let other = upsert_error(command_error(2, "BadValue"));
        assert_eq!(other.code(), CODE_PERSISTENCE_FAILED);
    }
}
