use std::sync::Arc;

use actix_governor::Governor;
use actix_web::{web, HttpResponse};
use utoipa::OpenApi;

use crate::database::DbConnector;
use crate::handlers;
use crate::middleware::{AuthMiddleware, FollowLimiterConfig};
use crate::models::HealthResponse;
use crate::openapi::ApiDoc;

pub fn configure_routes(cfg: &mut web::ServiceConfig, follow_limiter: &FollowLimiterConfig) {
    cfg.service(
        web::scope("/api")
            // Health check
            .route("/health", web::get().to(health_check))
            .route("/openapi.json", web::get().to(openapi_spec))
            // User routes (protected)
            .service(
                web::scope("/users")
                    .wrap(AuthMiddleware)
                    // Current caller - must be before /{id} to avoid conflict
                    .route("/me", web::get().to(handlers::get_current_user))
                    .route("/me", web::put().to(handlers::upsert_profile))
                    // Directory with pagination and search
                    .route("", web::get().to(handlers::get_users))
                    .route("/{id}", web::get().to(handlers::get_user))
                    .route("/{id}/threads", web::get().to(handlers::get_user_posts))
                    .route("/{id}/activity", web::get().to(handlers::get_activity))
                    .route(
                        "/{id}/followers/details",
                        web::get().to(handlers::get_follower_details),
                    )
                    // Follower graph, throttled per client
                    .service(
                        web::resource("/{id}/followers")
                            .wrap(Governor::new(follow_limiter))
                            .route(web::get().to(handlers::get_followers))
                            .route(web::post().to(handlers::follow_user))
                            .route(web::delete().to(handlers::unfollow_user)),
                    ),
            )
            // Thread routes (protected)
            .service(
                web::scope("/threads")
                    .wrap(AuthMiddleware)
                    .route("", web::post().to(handlers::create_thread))
                    .route("/{id}", web::get().to(handlers::get_thread))
                    .route("/{id}/replies", web::post().to(handlers::add_reply)),
            ),
    );
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse)
    )
)]
pub async fn health_check(connector: web::Data<Arc<DbConnector>>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        database_connected: connector.is_connected(),
    })
}

async fn openapi_spec() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};

    use crate::config::CONFIG;
    use crate::middleware::create_follow_rate_limiter_config;
    use crate::models::Claims;
    use crate::repositories::memory::MemoryStore;
    use crate::services::{ThreadService, UserService};

    const PEER: &str = "127.0.0.1:40000";

    fn token_for(sub: &str) -> String {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: sub.to_string(),
            exp: now + 3600,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(CONFIG.identity_token_secret.as_bytes()),
        )
        .unwrap()
    }

    fn profile(username: &str) -> Value {
        json!({
            "image": "https://img.example.com/a.png",
            "name": "Some Name",
            "username": username,
            "bio": "Hello there"
        })
    }

    macro_rules! test_app {
        () => {{
            let store = Arc::new(MemoryStore::new());
            let limiter = create_follow_rate_limiter_config();
            test::init_service(
                App::new()
                    .app_data(web::Data::new(UserService::new(store.clone(), store.clone())))
                    .app_data(web::Data::new(ThreadService::new(store.clone(), store)))
                    .app_data(web::Data::new(Arc::new(DbConnector::new(None, "threads"))))
                    .configure(move |cfg| configure_routes(cfg, &limiter)),
            )
            .await
        }};
    }

    fn authed(method: &str, uri: &str, sub: &str) -> test::TestRequest {
        let req = match method {
            "POST" => test::TestRequest::post(),
            "PUT" => test::TestRequest::put(),
            "DELETE" => test::TestRequest::delete(),
            _ => test::TestRequest::get(),
        };
        req.uri(uri)
            .peer_addr(PEER.parse().unwrap())
            .insert_header(("Authorization", format!("Bearer {}", token_for(sub))))
    }

    #[actix_web::test]
    async fn test_health_reports_disconnected_store() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["database_connected"], false);
    }

    #[actix_web::test]
    async fn test_protected_routes_require_token() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/api/users/me").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );

        let req = test::TestRequest::get()
            .uri("/api/threads/abc")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn test_profile_validation_and_upsert() {
        let app = test_app!();

        let mut bad = profile("ab");
        bad["image"] = json!("not a url");
        let req = authed("PUT", "/api/users/me", "u1").set_json(&bad).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);

        let mut good = profile("Alice");
        good["path"] = json!("/profile/edit");
        let req = authed("PUT", "/api/users/me", "u1").set_json(&good).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["user"]["username"], "alice");
        assert_eq!(body["data"]["revalidate_path"], "/profile/edit");

        let req = authed("GET", "/api/users/me", "u1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["id"], "u1");
        assert_eq!(body["data"]["onboarded"], true);
    }

    #[actix_web::test]
    async fn test_follow_flow_status_codes() {
        let app = test_app!();
        for (sub, username) in [("u1", "alice"), ("u2", "bob")] {
            let req = authed("PUT", "/api/users/me", sub)
                .set_json(profile(username))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = authed("POST", "/api/users/u1/followers", "u1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = authed("POST", "/api/users/u1/followers", "u2").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = authed("POST", "/api/users/u1/followers", "u2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "ALREADY_FOLLOWING");

        let req = authed("GET", "/api/users/u1/followers", "u2").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["id"], "u2");

        let req = authed("DELETE", "/api/users/u1/followers", "u2").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = authed("DELETE", "/api/users/u1/followers", "u2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], "NOT_FOLLOWING");

        let req = authed("POST", "/api/users/ghost/followers", "u2").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_thread_routes() {
        let app = test_app!();
        let req = authed("PUT", "/api/users/me", "u1")
            .set_json(profile("alice"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = authed("POST", "/api/threads", "u1")
            .set_json(json!({ "text": "hi" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = authed("POST", "/api/threads", "u1")
            .set_json(json!({ "text": "first thread" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let req = authed("POST", &format!("/api/threads/{}/replies", id), "u1")
            .set_json(json!({ "text": "a reply" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );

        let req = authed("GET", &format!("/api/threads/{}", id), "u1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["replies"].as_array().unwrap().len(), 1);

        let req = authed("GET", "/api/threads/not-an-id", "u1").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }
}
