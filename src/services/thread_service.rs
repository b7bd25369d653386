//! Thread service for posting threads and replies.

use std::sync::Arc;

use log::{debug, info, warn};
use mongodb::bson::oid::ObjectId;

use crate::constants::{
    CODE_INVALID_THREAD_ID, CODE_THREAD_NOT_FOUND, CODE_USER_NOT_FOUND, ERR_ADD_REPLY,
    ERR_CREATE_THREAD, ERR_FETCH_THREAD, ERR_INVALID_THREAD_ID, ERR_THREAD_NOT_FOUND,
    ERR_USER_NOT_FOUND,
};
use crate::errors::ApiError;
use crate::models::{AuthorSummary, ReplyResponse, Thread, ThreadResponse, User};
use crate::repositories::{ThreadStore, UserStore};

fn thread_not_found() -> ApiError {
    ApiError::NotFound {
        code: CODE_THREAD_NOT_FOUND.to_string(),
        message: ERR_THREAD_NOT_FOUND.to_string(),
    }
}

fn parse_thread_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::BadRequest {
        code: CODE_INVALID_THREAD_ID.to_string(),
        message: ERR_INVALID_THREAD_ID.to_string(),
    })
}

pub struct ThreadService {
    users: Arc<dyn UserStore>,
    threads: Arc<dyn ThreadStore>,
}

impl ThreadService {
    pub fn new(users: Arc<dyn UserStore>, threads: Arc<dyn ThreadStore>) -> Self {
        Self { users, threads }
    }

    /// Post a top-level thread and record it on the author's profile.
    pub async fn create_thread(
        &self,
        author_id: &str,
        text: String,
    ) -> Result<ThreadResponse, ApiError> {
        info!("Creating thread for user: {}", author_id);
        let author = self
            .require_author(author_id)
            .await
            .map_err(|e| e.context(ERR_CREATE_THREAD))?;
        let author_oid = author_object_id(&author)?;

        let mut thread = Thread::new(text, author_oid, None);
        let id = self
            .threads
            .insert(&thread)
            .await
            .map_err(|e| e.context(ERR_CREATE_THREAD))?;
        self.users
            .push_thread(author_oid, id)
            .await
            .map_err(|e| e.context(ERR_CREATE_THREAD))?;

        thread.id = Some(id);
        info!("Created thread {} for user {}", id, author_id);
        Ok(ThreadResponse::new(
            thread,
            Some(AuthorSummary::from(&author)),
            Vec::new(),
        ))
    }

    /// Reply to an existing thread. The reply is linked from the parent's
    /// children, not from the author's own thread list.
    pub async fn add_reply(
        &self,
        parent_id: &str,
        author_id: &str,
        text: String,
    ) -> Result<ReplyResponse, ApiError> {
        let parent_oid = parse_thread_id(parent_id)?;
        info!("User {} replying to thread {}", author_id, parent_id);

        let parent = self
            .threads
            .find_by_id(parent_oid)
            .await
            .map_err(|e| e.context(ERR_ADD_REPLY))?
            .ok_or_else(|| {
                warn!("Reply failed: thread {} not found", parent_id);
                thread_not_found()
            })?;
        let author = self
            .require_author(author_id)
            .await
            .map_err(|e| e.context(ERR_ADD_REPLY))?;

        let mut reply = Thread::new(text, author_object_id(&author)?, parent.id);
        let id = self
            .threads
            .insert(&reply)
            .await
            .map_err(|e| e.context(ERR_ADD_REPLY))?;

        // An unlinked reply is unreachable, so it is removed again.
        let linked = match self.threads.push_child(parent_oid, id).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("Thread {} disappeared before reply {} was linked", parent_id, id);
                Err(thread_not_found())
            }
            Err(e) => Err(e.context(ERR_ADD_REPLY)),
        };
        if let Err(e) = linked {
            if let Err(cleanup) = self.threads.delete(id).await {
                warn!("Failed to remove unlinked reply {}: {}", id, cleanup);
            }
            return Err(e);
        }

        reply.id = Some(id);
        Ok(ReplyResponse::new(reply, Some(AuthorSummary::from(&author))))
    }

    /// A thread with its author and replies expanded.
    pub async fn get_thread(&self, id: &str) -> Result<ThreadResponse, ApiError> {
        let oid = parse_thread_id(id)?;
        debug!("Fetching thread: {}", id);

        let thread = self
            .threads
            .find_by_id(oid)
            .await
            .map_err(|e| e.context(ERR_FETCH_THREAD))?
            .ok_or_else(thread_not_found)?;
        let replies = self
            .threads
            .find_by_ids(&thread.children)
            .await
            .map_err(|e| e.context(ERR_FETCH_THREAD))?;

        let mut author_ids: Vec<ObjectId> = replies.iter().map(|r| r.author).collect();
        author_ids.push(thread.author);
        let authors: Vec<User> = self
            .users
            .find_by_object_ids(&author_ids)
            .await
            .map_err(|e| e.context(ERR_FETCH_THREAD))?;
        let summary_for = |oid: ObjectId| {
            authors
                .iter()
                .find(|u| u.object_id == Some(oid))
                .map(AuthorSummary::from)
        };

        let replies = replies
            .into_iter()
            .map(|reply| {
                let author = summary_for(reply.author);
                ReplyResponse::new(reply, author)
            })
            .collect();
        let author = summary_for(thread.author);
        Ok(ThreadResponse::new(thread, author, replies))
    }

    async fn require_author(&self, author_id: &str) -> Result<User, ApiError> {
        self.users
            .find_by_identity(author_id)
            .await?
            .ok_or_else(|| {
                warn!("Author {} not found", author_id);
                ApiError::NotFound {
                    code: CODE_USER_NOT_FOUND.to_string(),
                    message: ERR_USER_NOT_FOUND.to_string(),
                }
            })
    }
}

fn author_object_id(user: &User) -> Result<ObjectId, ApiError> {
    user.object_id.ok_or_else(|| ApiError::NotFound {
        code: CODE_USER_NOT_FOUND.to_string(),
        message: ERR_USER_NOT_FOUND.to_string(),
    })
}
