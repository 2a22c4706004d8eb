use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use pitstop_backend::config::mongo_conf::MongoConfig;
use pitstop_backend::middlewares::auth_middleware::AuthState;
use pitstop_backend::repository::garage_repo::MongoGarageRepository;
use pitstop_backend::router::garage_router::garage_router;
use pitstop_backend::service::garage_service::GarageServiceImpl;
use pitstop_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use serde_json::json;

async fn setup_app() -> (Router, Arc<JwtTokenUtilsImpl>) {
    let mongo_config = MongoConfig::from_test_env();
    let jwt_utils = Arc::new(JwtTokenUtilsImpl::from_test_env());
    let auth_state = Arc::new(AuthState {
        jwt_utils: jwt_utils.clone(),
    });
    let garage_repo = Arc::new(
        MongoGarageRepository::new(&mongo_config)
            .await
            .expect("garage repo"),
    );
    let garage_service = Arc::new(GarageServiceImpl::new(garage_repo));
    (garage_router(garage_service, auth_state), jwt_utils)
}

fn bearer(jwt_utils: &JwtTokenUtilsImpl, role: &str) -> String {
    let token = jwt_utils
        .generate_access_token("65f1a2b3c4d5e6f7a8b9c0d1", "user@example.com", role)
        .expect("token");
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_admin_listing_rejects_garage_role() {
    let (app, jwt_utils) = setup_app().await;
    let req = Request::builder()
        .method("GET")
        .uri("/admin/garages")
        .header("authorization", bearer(&jwt_utils, "garage"))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_listing_requires_auth() {
    let (app, _) = setup_app().await;
    let req = Request::builder()
        .method("GET")
        .uri("/admin/garages")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garage_status_update_rejects_invalid_id() {
    let (app, jwt_utils) = setup_app().await;
    let req = Request::builder()
        .method("PUT")
        .uri("/admin/garages/not-an-id/status")
        .header("authorization", bearer(&jwt_utils, "admin"))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "approved" }).to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_validates_payload() {
    let (app, jwt_utils) = setup_app().await;
    let body = json!({ "name": "G", "email": "nope", "phone": "1" });
    let req = Request::builder()
        .method("POST")
        .uri("/garage/register")
        .header("authorization", bearer(&jwt_utils, "garage"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
