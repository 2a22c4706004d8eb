use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use pitstop_backend::config::mongo_conf::MongoConfig;
use pitstop_backend::middlewares::auth_middleware::AuthState;
use pitstop_backend::repository::booking_repo::MongoBookingRepository;
use pitstop_backend::repository::garage_repo::MongoGarageRepository;
use pitstop_backend::router::booking_router::booking_router;
use pitstop_backend::service::booking_service::BookingServiceImpl;
use pitstop_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use serde_json::json;

// The driver connects lazily, so handler paths that fail before touching
// the database (auth, input validation) are testable without a live Mongo.
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
    let booking_repo = MongoBookingRepository::new(&mongo_config)
        .await
        .expect("booking repo");
    let booking_service = Arc::new(BookingServiceImpl::new(booking_repo, garage_repo));
    (booking_router(booking_service, auth_state), jwt_utils)
}

fn bearer(jwt_utils: &JwtTokenUtilsImpl, role: &str) -> String {
    let token = jwt_utils
        .generate_access_token("65f1a2b3c4d5e6f7a8b9c0d1", "user@example.com", role)
        .expect("token");
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_garage_bookings_requires_auth() {
    let (app, _) = setup_app().await;
    let req = Request::builder()
        .method("GET")
        .uri("/garage/bookings")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garage_bookings_rejects_wrong_role() {
    let (app, jwt_utils) = setup_app().await;
    let req = Request::builder()
        .method("GET")
        .uri("/garage/bookings?status=new")
        .header("authorization", bearer(&jwt_utils, "admin"))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_garage_bookings_rejects_garbage_token() {
    let (app, _) = setup_app().await;
    let req = Request::builder()
        .method("GET")
        .uri("/garage/bookings")
        .header("authorization", "Bearer not.a.real.token")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_slot_availability_rejects_malformed_date() {
    let (app, _) = setup_app().await;
    let req = Request::builder()
        .method("GET")
        .uri("/bookings/slot-availability?date=10-06-2025")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slot_availability_requires_date_param() {
    let (app, _) = setup_app().await;
    let req = Request::builder()
        .method("GET")
        .uri("/bookings/slot-availability")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_booking_collects_field_errors() {
    let (app, _) = setup_app().await;
    let body = json!({
        "customerName": "J",
        "customerEmail": "not-an-email",
        "customerPhone": "123",
        "vehicleReg": "AB12 CDE",
        "serviceType": "teleportation",
        "serviceDate": "whenever",
        "pickupSlot": "06:00",
        "dropoffSlot": "23:00",
        "price": "abc"
    });
    let req = Request::builder()
        .method("POST")
        .uri("/bookings")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let errors = json["errors"].as_object().expect("per-field error map");
    for field in [
        "customerName",
        "customerEmail",
        "customerPhone",
        "serviceType",
        "serviceDate",
        "pickupSlot",
        "dropoffSlot",
        "price",
    ] {
        assert!(errors.contains_key(field), "missing error for {}", field);
    }
}

#[tokio::test]
async fn test_create_booking_rejects_short_gap() {
    let (app, _) = setup_app().await;
    // 11:30 pickup + 12:30 dropoff is only 60 minutes apart
    let body = json!({
        "customerName": "Sam Driver",
        "customerEmail": "sam@example.com",
        "customerPhone": "0123456789",
        "vehicleReg": "AB12 CDE",
        "serviceType": "mot",
        "serviceDate": "2099-01-15",
        "pickupSlot": "11:30",
        "dropoffSlot": "12:30",
        "price": "150.00"
    });
    let req = Request::builder()
        .method("POST")
        .uri("/bookings")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(json["errors"]["dropoffSlot"]
        .as_str()
        .unwrap()
        .contains("120"));
}

#[tokio::test]
async fn test_update_booking_status_rejects_invalid_id() {
    let (app, jwt_utils) = setup_app().await;
    let req = Request::builder()
        .method("PUT")
        .uri("/garage/bookings/not-an-object-id/status")
        .header("authorization", bearer(&jwt_utils, "garage"))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "accepted" }).to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
