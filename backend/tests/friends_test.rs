//! Integration tests for friend requests and friendships

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_friend_request_accept_and_remove() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    let (status, target) = app
        .post_auth(
            "/api/v1/friends/requests",
            json!({ "email": bob.email }),
            &alice.token,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(target["id"], bob.id.to_string());

    let (status, requests) = app.get_auth("/api/v1/friends/requests", &bob.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(requests[0]["from"], alice.id.to_string());

    let (status, friend) = app
        .post_auth(
            &format!("/api/v1/friends/requests/{}/accept", alice.id),
            json!({}),
            &bob.token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(friend["username"], alice.username.as_str());

    for (user, other) in [(&alice, &bob), (&bob, &alice)] {
        let (_, friends) = app.get_auth("/api/v1/friends", &user.token).await;
        assert_eq!(friends.as_array().unwrap().len(), 1);
        assert_eq!(friends[0]["id"], other.id.to_string());
    }

    let (status, _) = app
        .delete_auth(&format!("/api/v1/friends/{}", bob.id), &alice.token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, friends) = app.get_auth("/api/v1/friends", &bob.token).await;
    assert!(friends.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_friend_request_conflicts() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    let (status, _) = app
        .post_auth(
            "/api/v1/friends/requests",
            json!({ "email": alice.email }),
            &alice.token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = json!({ "email": bob.email });
    let (status, _) = app
        .post_auth("/api/v1/friends/requests", request.clone(), &alice.token)
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post_auth("/api/v1/friends/requests", request, &alice.token)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post_auth(
            "/api/v1/friends/requests",
            json!({ "email": "nobody@example.com" }),
            &alice.token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_decline_friend_request() {
    let app = TestApp::new();
    let alice = app.register_user().await;
    let bob = app.register_user().await;

    app.post_auth(
        "/api/v1/friends/requests",
        json!({ "email": bob.email }),
        &alice.token,
    )
    .await;

    let path = format!("/api/v1/friends/requests/{}/decline", alice.id);
    let (status, _) = app.post_auth(&path, json!({}), &bob.token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.post_auth(&path, json!({}), &bob.token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, friends) = app.get_auth("/api/v1/friends", &alice.token).await;
    assert!(friends.as_array().unwrap().is_empty());
}
