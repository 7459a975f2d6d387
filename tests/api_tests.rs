// HTTP tests for the /api/v1 routes, backed by the in-memory store

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::Arc;

use lume_match::auth::{Claims, JwtVerifier};
use lume_match::core::Ranker;
use lume_match::models::{Gender, Intent, User, UserId};
use lume_match::routes::{self, AppState};
use lume_match::services::MemoryStore;

const SECRET: &str = "test-secret";

fn create_user(id: UserId, gender: Gender, interests: &[&str]) -> User {
    User {
        id,
        display_name: format!("User {}", id),
        gender: Some(gender),
        intent: Intent::Dating,
        interests: interests.iter().map(|s| s.to_string()).collect(),
        date_of_birth: None,
        description: Some("hello".to_string()),
        pictures: vec![],
        match_count: 0,
        created_at: Utc::now(),
    }
}

fn bearer(user_id: UserId) -> (&'static str, String) {
    bearer_for(&user_id.to_string())
}

fn bearer_for(subject: &str) -> (&'static str, String) {
    let claims = Claims {
        sub: subject.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
        iss: None,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();
    ("Authorization", format!("Bearer {}", token))
}

fn app_state() -> AppState {
    let store = Arc::new(MemoryStore::with_users([
        create_user(1, Gender::Male, &["hiking", "music"]),
        create_user(2, Gender::Female, &["music"]),
        create_user(3, Gender::Female, &["hiking", "music"]),
        create_user(4, Gender::Male, &[]),
    ]));
    AppState::new(store.clone(), store, Ranker::default(), JwtVerifier::new(SECRET, None))
}

macro_rules! init_app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state()))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_request_and_accept_flow() {
    let app = init_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/2")
        .insert_header(bearer(1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "pending");
    assert_eq!(body["requestedBy"], 1);
    assert_eq!(body["participants"].as_array().map(Vec::len), Some(2));

    // Repeat request returns the existing record
    let req = test::TestRequest::post()
        .uri("/api/v1/matches/2")
        .insert_header(bearer(1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/matches/pending")
        .insert_header(bearer(2))
        .to_request();
    let pending: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pending.as_array().map(Vec::len), Some(1));

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/1/accept")
        .insert_header(bearer(2))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "active");
    assert!(body["matchedAt"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/v1/matches/active")
        .insert_header(bearer(1))
        .to_request();
    let active: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(active.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_error_statuses() {
    let app = init_app!();

    let cases = [
        (test::TestRequest::post().uri("/api/v1/matches/2"), None, StatusCode::UNAUTHORIZED),
        (test::TestRequest::post().uri("/api/v1/matches/abc"), Some(1), StatusCode::BAD_REQUEST),
        (test::TestRequest::post().uri("/api/v1/matches/1"), Some(1), StatusCode::BAD_REQUEST),
        (test::TestRequest::post().uri("/api/v1/matches/4"), Some(1), StatusCode::FORBIDDEN),
        (test::TestRequest::post().uri("/api/v1/matches/9"), Some(1), StatusCode::NOT_FOUND),
        (test::TestRequest::post().uri("/api/v1/matches/3/accept"), Some(1), StatusCode::NOT_FOUND),
        (
            test::TestRequest::get().uri("/api/v1/matches/active?start=2024-02-01&end=2024-01-01"),
            Some(1),
            StatusCode::BAD_REQUEST,
        ),
    ];

    for (builder, caller, expected) in cases {
        let builder = match caller {
            Some(id) => builder.insert_header(bearer(id)),
            None => builder,
        };
        let resp = test::call_service(&app, builder.to_request()).await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_web::test]
async fn test_error_body_shape() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/matches/active?start=someday")
        .insert_header(bearer(1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_range");
    assert_eq!(body["status_code"], 400);
}

#[actix_web::test]
async fn test_recommendations() {
    let app = init_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/recommendations?interests=hiking,music")
        .insert_header(bearer(1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total_results"], 2);
    assert_eq!(body["candidates"][0]["id"], 3);
    assert_eq!(body["candidates"][0]["score"], 2);
    assert_eq!(body["candidates"][1]["id"], 2);
}

#[actix_web::test]
async fn test_recommendations_post_and_auth() {
    let app = init_app!();

    let req = test::TestRequest::get().uri("/api/v1/recommendations").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let too_many: Vec<String> = (0..60).map(|i| format!("tag{}", i)).collect();
    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .insert_header(bearer(1))
        .set_json(json!({ "interests": too_many }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .insert_header(bearer(1))
        .set_json(json!({ "interests": ["music"] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_results"], 2);
    assert!(body["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["score"] == 1));
}

#[actix_web::test]
async fn test_non_numeric_subject_is_bad_request_everywhere() {
    let app = init_app!();

    let requests = [
        test::TestRequest::get().uri("/api/v1/recommendations"),
        test::TestRequest::post()
            .uri("/api/v1/recommendations")
            .set_json(json!({ "interests": ["music"] })),
        test::TestRequest::get().uri("/api/v1/matches/pending"),
        test::TestRequest::post().uri("/api/v1/matches/2"),
    ];

    for builder in requests {
        let resp = test::call_service(&app, builder.insert_header(bearer_for("alice")).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_identifier");
    }

    // A malformed token still counts as no caller
    let req = test::TestRequest::get()
        .uri("/api/v1/recommendations")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
