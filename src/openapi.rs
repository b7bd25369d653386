use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AuthorSummary, ErrorResponse, FollowerDetail, HealthResponse, ProfileSaved, ReplyResponse,
    SortOrder, ThreadRequest, ThreadResponse, UpsertProfileRequest, UserPage, UserPostsResponse,
    UserResponse,
};

/// OpenAPI documentation for the Threads API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Threads API",
        version = "1.0.0",
        description = "Profiles, follower graph and threads for a small social network. Sessions are issued by an external identity provider.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "Profiles, user directory, posts and activity"),
        (name = "Followers", description = "Follower graph endpoints"),
        (name = "Threads", description = "Threads and replies")
    ),
    paths(
        crate::handlers::get_users,
        crate::handlers::get_current_user,
        crate::handlers::upsert_profile,
        crate::handlers::get_user,
        crate::handlers::get_user_posts,
        crate::handlers::get_activity,
        crate::handlers::follow_user,
        crate::handlers::unfollow_user,
        crate::handlers::get_followers,
        crate::handlers::get_follower_details,
        crate::handlers::create_thread,
        crate::handlers::get_thread,
        crate::handlers::add_reply,
        crate::routes::health_check
    ),
    components(
        schemas(
            UpsertProfileRequest,
            ThreadRequest,
            SortOrder,
            UserResponse,
            UserPage,
            AuthorSummary,
            FollowerDetail,
            ProfileSaved,
            UserPostsResponse,
            ThreadResponse,
            ReplyResponse,
            ErrorResponse,
            HealthResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security configuration for Bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token issued by the identity provider"))
                        .build(),
                ),
            );
        }
    }
}
