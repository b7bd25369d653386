//! Thread handlers: posting threads, replying, and reading a thread.

use actix_web::{web, HttpRequest, HttpResponse};

use crate::constants::{MSG_REPLY_ADDED, MSG_THREAD_CREATED, MSG_THREAD_FOUND};
use crate::errors::ApiError;
use crate::middleware::require_auth;
use crate::models::{ApiResponse, ThreadRequest};
use crate::services::ThreadService;
use crate::validators::validate_request;

/// Post a new thread as the caller
#[utoipa::path(
    post,
    path = "/api/threads",
    tag = "Threads",
    request_body = ThreadRequest,
    responses(
        (status = 201, description = "Thread created", body = crate::models::ThreadResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 404, description = "Caller has not onboarded", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_thread(
    thread_service: web::Data<ThreadService>,
    body: web::Json<ThreadRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    validate_request(&*body)?;

    let thread = thread_service
        .create_thread(&claims.sub, body.into_inner().text)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_THREAD_CREATED, thread)))
}

/// Get a thread with its replies
#[utoipa::path(
    get,
    path = "/api/threads/{id}",
    tag = "Threads",
    params(
        ("id" = String, Path, description = "Thread id")
    ),
    responses(
        (status = 200, description = "Thread found", body = crate::models::ThreadResponse),
        (status = 400, description = "Invalid thread id", body = crate::models::ErrorResponse),
        (status = 404, description = "Thread not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_thread(
    thread_service: web::Data<ThreadService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let thread = thread_service.get_thread(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_THREAD_FOUND, thread)))
}

/// Reply to a thread as the caller
#[utoipa::path(
    post,
    path = "/api/threads/{id}/replies",
    tag = "Threads",
    params(
        ("id" = String, Path, description = "Parent thread id")
    ),
    request_body = ThreadRequest,
    responses(
        (status = 201, description = "Reply added", body = crate::models::ReplyResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 404, description = "Thread not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_reply(
    thread_service: web::Data<ThreadService>,
    path: web::Path<String>,
    body: web::Json<ThreadRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    validate_request(&*body)?;

    let reply = thread_service
        .add_reply(&path.into_inner(), &claims.sub, body.into_inner().text)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_REPLY_ADDED, reply)))
}
