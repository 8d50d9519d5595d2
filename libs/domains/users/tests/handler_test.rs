//! Handler tests for the Users domain, over the in-memory repository.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

fn test_app() -> (Router, InMemoryUserRepository) {
    let repo = InMemoryUserRepository::new();
    let router = handlers::router(UserService::new(repo.clone()));
    (router, repo)
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn user_payload(email: &str) -> Value {
    json!({
        "fname": "Ada",
        "lname": "Lovelace",
        "age": 36,
        "email": email
    })
}

async fn create_user(app: &Router, email: &str) -> User {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/users", user_payload(email)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_user_returns_201_with_defaults() {
    let (app, _) = test_app();
    let data = TestDataBuilder::from_test_name("users_create_201");

    let response = app
        .oneshot(json_request("POST", "/users", user_payload(&data.email("ada"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["email"], data.email("ada"));
    assert_eq!(body["role"], "user");
    assert_eq!(body["rating"], 0.0);
    assert_eq!(body["_id"].as_str().unwrap().len(), 24);
}

#[tokio::test]
async fn test_duplicate_email_returns_409_and_inserts_nothing() {
    let (app, repo) = test_app();
    create_user(&app, "ada@example.com").await;

    let response = app
        .oneshot(json_request("POST", "/users", user_payload("ada@example.com")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "User already exists");
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(repo.find().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_user_body_returns_400() {
    let (app, _) = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/users",
            json!({ "fname": "Ada", "email": "not-an-email", "age": -1 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["email"].is_array());
    assert!(body["details"]["age"].is_array());
}

#[tokio::test]
async fn test_list_and_get_users() {
    let (app, _) = test_app();
    let ada = create_user(&app, "ada@example.com").await;
    create_user(&app, "grace@example.com").await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/users"))
        .await
        .unwrap();
    let users: Vec<User> = json_body(response.into_body()).await;
    assert_eq!(users.len(), 2);

    let response = app
        .clone()
        .oneshot(empty_request("GET", &format!("/users/{}", ada.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: User = json_body(response.into_body()).await;
    assert_eq!(fetched, ada);

    let response = app
        .oneshot(empty_request("GET", "/users/65a1b2c3d4e5f6a7b8c9d0e1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert!(body.is_null());
}

#[tokio::test]
async fn test_update_user_and_email_collision() {
    let (app, _) = test_app();
    create_user(&app, "ada@example.com").await;
    let grace = create_user(&app, "grace@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/users/{}", grace.id),
            json!({ "rating": 4.5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: User = json_body(response.into_body()).await;
    assert_eq!(updated.rating, 4.5);
    assert_eq!(updated.email, grace.email);
    assert_eq!(updated.created_at, grace.created_at);

    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/users/{}", grace.id),
            json!({ "email": "ada@example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_absent_user_returns_404() {
    let (app, _) = test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/users/65a1b2c3d4e5f6a7b8c9d0e1",
            json!({ "age": 30 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_delete_user_and_legacy_path() {
    let (app, repo) = test_app();
    let ada = create_user(&app, "ada@example.com").await;
    let grace = create_user(&app, "grace@example.com").await;

    for uri in [format!("/users/{}", ada.id), format!("/users/delete/{}", grace.id)] {
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let message: String = json_body(response.into_body()).await;
        assert_eq!(message, "User successfully deleted!");
    }

    assert!(repo.find().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_id_returns_400() {
    let (app, _) = test_app();

    for (method, uri) in [("PUT", "/users"), ("DELETE", "/users/")] {
        let response = app
            .clone()
            .oneshot(json_request(method, uri, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["error"], "User ID is required");
    }
}

#[tokio::test]
async fn test_session_hook_creates_user_once() {
    let (app, repo) = test_app();
    let session = json!({
        "user": { "email": "new@example.com", "name": "New Person" },
        "expires": "2026-12-01T00:00:00Z"
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/auth/session", session.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-provisioning-outcome"], "created");
    let echoed: Value = json_body(response.into_body()).await;
    assert_eq!(echoed, session);

    let response = app
        .oneshot(json_request("POST", "/auth/session", session))
        .await
        .unwrap();
    assert_eq!(response.headers()["x-provisioning-outcome"], "existing");

    let users = repo.find().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, "user");
    assert_eq!(users[0].rating, 0.0);
}

#[tokio::test]
async fn test_session_without_email_is_skipped() {
    let (app, repo) = test_app();

    let response = app
        .oneshot(json_request("POST", "/auth/session", json!({ "user": null })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-provisioning-outcome"], "skipped");
    assert!(repo.find().await.unwrap().is_empty());
}
