//! Integration tests for authentication endpoints

mod common;

use axum::http::StatusCode;
use common::{TestApp, PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_register_returns_tokens() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            json!({ "email": "lifter@example.com", "username": "lifter", "password": PASSWORD }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
async fn test_register_duplicate_email_ignores_case() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, body) = app
        .post(
            "/api/v1/auth/register",
            json!({
                "email": user.email.to_uppercase(),
                "username": "someone_else",
                "password": PASSWORD,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let app = TestApp::new();

    let cases = [
        json!({ "email": "not-an-email", "username": "lifter", "password": PASSWORD }),
        json!({ "email": "weak@example.com", "username": "lifter", "password": "123" }),
        json!({ "email": "name@example.com", "username": "a b", "password": PASSWORD }),
    ];

    for case in cases {
        let (status, body) = app.post("/api/v1/auth/register", case).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_login_and_profile() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, body) = app
        .post(
            "/api/v1/auth/login",
            json!({ "email": user.email, "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["access_token"].as_str().unwrap();
    let (status, profile) = app.get_auth("/api/v1/auth/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], user.username.as_str());
    assert_eq!(profile["id"], user.id.to_string());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    let user = app.register_user().await;

    let (status, _) = app
        .post(
            "/api/v1/auth/login",
            json!({ "email": user.email, "password": "WrongPassword1!" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_requires_refresh_token() {
    let app = TestApp::new();
    let (_, tokens) = app
        .post(
            "/api/v1/auth/register",
            json!({ "email": "refresh@example.com", "username": "refresher", "password": PASSWORD }),
        )
        .await;

    let (status, body) = app
        .post(
            "/api/v1/auth/refresh",
            json!({ "refresh_token": tokens["refresh_token"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());

    let (status, _) = app
        .post(
            "/api/v1/auth/refresh",
            json!({ "refresh_token": tokens["access_token"] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/v1/training-plans").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get_auth("/api/v1/training-plans", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
