//! Thread repository for MongoDB operations on threads and replies.

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Collection, IndexModel};

use crate::constants::{CODE_PERSISTENCE_FAILED, COLLECTION_THREADS, ERR_CREATE_THREAD};
use crate::database::DbConnector;
use crate::errors::ApiError;
use crate::models::Thread;

use super::ThreadStore;

/// MongoDB-backed `ThreadStore`.
pub struct ThreadRepository {
    connector: Arc<DbConnector>,
}

impl ThreadRepository {
    pub fn new(connector: Arc<DbConnector>) -> Self {
        Self { connector }
    }

    async fn collection(&self) -> Result<Collection<Thread>, ApiError> {
        Ok(self.connector.database().await?.collection(COLLECTION_THREADS))
    }
}

#[async_trait]
impl ThreadStore for ThreadRepository {
    async fn create_indexes(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for threads collection...");

        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "author": 1, "created_at": -1 })
                .build(),
            IndexModel::builder().keys(doc! { "parent_id": 1 }).build(),
        ];

        self.collection().await?.create_indexes(indexes).await?;
        info!("Thread indexes created successfully");
        Ok(())
    }

    async fn insert(&self, thread: &Thread) -> Result<ObjectId, ApiError> {
        let result = self.collection().await?.insert_one(thread).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| ApiError::InternalServerError {
                code: CODE_PERSISTENCE_FAILED.to_string(),
                message: ERR_CREATE_THREAD.to_string(),
            })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Thread>, ApiError> {
        debug!("Repository: Finding thread by ID: {}", id);
        Ok(self.collection().await?.find_one(doc! { "_id": id }).await?)
    }

    async fn delete(&self, id: ObjectId) -> Result<(), ApiError> {
        debug!("Repository: Deleting thread: {}", id);
        self.collection()
            .await?
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Thread>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .collection()
            .await?
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_by_author(&self, author: ObjectId) -> Result<Vec<Thread>, ApiError> {
        debug!("Repository: Finding threads by author: {}", author);
        let cursor = self
            .collection()
            .await?
            .find(doc! { "author": author })
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn find_by_ids_excluding_author(
        &self,
        ids: &[ObjectId],
        author: ObjectId,
    ) -> Result<Vec<Thread>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .collection()
            .await?
            .find(doc! {
                "_id": { "$in": ids.to_vec() },
                "author": { "$ne": author }
            })
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn push_child(&self, parent: ObjectId, child: ObjectId) -> Result<bool, ApiError> {
        let result = self
            .collection()
            .await?
            .update_one(doc! { "_id": parent }, doc! { "$push": { "children": child } })
            .await?;
        Ok(result.matched_count == 1)
    }
}
