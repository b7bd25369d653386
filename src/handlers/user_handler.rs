//! User handlers: profiles, directory, posts, activity and followers.

use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, info, warn};

use crate::constants::{
    CODE_USER_NOT_FOUND, ERR_USER_NOT_FOUND, MSG_ACTIVITY, MSG_FOLLOWERS_FETCHED,
    MSG_FOLLOWER_ADDED, MSG_FOLLOWER_DETAILS_FETCHED, MSG_FOLLOWER_REMOVED, MSG_PROFILE_SAVED,
    MSG_USERS_FETCHED, MSG_USER_FOUND, MSG_USER_POSTS, MSG_USER_PROFILE_RETRIEVED,
};
use crate::errors::ApiError;
use crate::middleware::require_auth;
use crate::models::{
    ApiResponse, ProfileSaved, UpsertProfileRequest, UserListQuery, UserResponse,
};
use crate::services::{ListUsers, UpsertProfile, UserService};
use crate::validators::validate_request;

fn user_not_found() -> ApiError {
    ApiError::NotFound {
        code: CODE_USER_NOT_FOUND.to_string(),
        message: ERR_USER_NOT_FOUND.to_string(),
    }
}

/// List users with pagination and optional search, excluding the caller
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(UserListQuery),
    responses(
        (status = 200, description = "One page of users", body = crate::models::UserPage),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_users(
    user_service: web::Data<UserService>,
    query: web::Query<UserListQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    let query = query.into_inner();

    let page = user_service
        .list_users(ListUsers {
            requester_id: claims.sub,
            search: query.search,
            page: query.page,
            page_size: query.per_page,
            sort: query.sort.unwrap_or_default(),
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_USERS_FETCHED, page)))
}

/// Get the caller's own profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 404, description = "User has not onboarded yet", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_current_user(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    debug!("Fetching current user with id: {}", claims.sub);

    let user = user_service
        .get_user_by_identity(&claims.sub)
        .await?
        .ok_or_else(|| {
            warn!("Current user not found with id: {}", claims.sub);
            user_not_found()
        })?;

    let user_response: UserResponse = user.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_USER_PROFILE_RETRIEVED,
        user_response,
    )))
}

/// Create or update the caller's profile (onboarding and profile edits)
#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "Users",
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = ProfileSaved),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 409, description = "Username already taken", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upsert_profile(
    user_service: web::Data<UserService>,
    body: web::Json<UpsertProfileRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    validate_request(&*body)?;
    let body = body.into_inner();

    let (user, revalidate_path) = user_service
        .upsert_profile(UpsertProfile {
            identity_id: claims.sub.clone(),
            username: body.username,
            name: body.name,
            bio: body.bio,
            image: body.image,
            path: body.path,
        })
        .await?;

    info!("Saved profile for user: {}", claims.sub);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_PROFILE_SAVED,
        ProfileSaved {
            user: user.into(),
            revalidate_path,
        },
    )))
}

/// Get a user by identity id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "Identity id")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let user = user_service
        .get_user_by_identity(&user_id)
        .await?
        .ok_or_else(|| {
            warn!("User not found with id: {}", user_id);
            user_not_found()
        })?;

    let user_response: UserResponse = user.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_USER_FOUND, user_response)))
}

/// Get a user's threads with replies and reply authors expanded
#[utoipa::path(
    get,
    path = "/api/users/{id}/threads",
    tag = "Users",
    params(
        ("id" = String, Path, description = "Identity id")
    ),
    responses(
        (status = 200, description = "User with threads", body = crate::models::UserPostsResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user_posts(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();

    let posts = user_service
        .get_user_posts(&user_id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_USER_POSTS, posts)))
}

/// Replies other users left on this user's threads
#[utoipa::path(
    get,
    path = "/api/users/{id}/activity",
    tag = "Users",
    params(
        ("id" = String, Path, description = "Identity id")
    ),
    responses(
        (status = 200, description = "Activity feed", body = Vec<crate::models::ReplyResponse>),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_activity(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let activity = user_service.get_activity(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_ACTIVITY, activity)))
}

/// Follow a user as the caller
#[utoipa::path(
    post,
    path = "/api/users/{id}/followers",
    tag = "Followers",
    params(
        ("id" = String, Path, description = "Identity id of the user to follow")
    ),
    responses(
        (status = 200, description = "Follower added"),
        (status = 400, description = "Cannot follow yourself", body = crate::models::ErrorResponse),
        (status = 404, description = "User or follower not found", body = crate::models::ErrorResponse),
        (status = 409, description = "Already following", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn follow_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    user_service.follow(&path.into_inner(), &claims.sub).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_FOLLOWER_ADDED)))
}

/// Stop following a user as the caller
#[utoipa::path(
    delete,
    path = "/api/users/{id}/followers",
    tag = "Followers",
    params(
        ("id" = String, Path, description = "Identity id of the user to unfollow")
    ),
    responses(
        (status = 200, description = "Follower removed"),
        (status = 404, description = "User or follower not found", body = crate::models::ErrorResponse),
        (status = 409, description = "Not following", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn unfollow_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    user_service.unfollow(&path.into_inner(), &claims.sub).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_FOLLOWER_REMOVED)))
}

/// List a user's followers in follow order
#[utoipa::path(
    get,
    path = "/api/users/{id}/followers",
    tag = "Followers",
    params(
        ("id" = String, Path, description = "Identity id")
    ),
    responses(
        (status = 200, description = "Followers", body = Vec<UserResponse>),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_followers(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let followers: Vec<UserResponse> = user_service
        .list_followers(&path.into_inner())
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_FOLLOWERS_FETCHED, followers)))
}

/// List a user's followers with follower counts and follow-back state
#[utoipa::path(
    get,
    path = "/api/users/{id}/followers/details",
    tag = "Followers",
    params(
        ("id" = String, Path, description = "Identity id")
    ),
    responses(
        (status = 200, description = "Follower details", body = Vec<crate::models::FollowerDetail>),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_follower_details(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let details = user_service
        .list_follower_details(&path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_FOLLOWER_DETAILS_FETCHED,
        details,
    )))
}
