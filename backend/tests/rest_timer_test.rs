//! Integration tests for the rest timer endpoints

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::test]
async fn test_keep_alive_notifies_when_rest_is_over() {
    let app = TestApp::new();
    let user = app.register_user().await;
    let mut rx = app.state.notifications.hub().subscribe(user.id).await;

    let (status, body) = app
        .post_auth("/api/v1/keep-alive", json!({ "pauseTime": 1 }), &user.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rest timer started");
    assert!(app.state.rest_timers.is_running(user.id).await);

    let payload = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("rest timer did not fire")
        .unwrap();
    let notification: Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(notification["type"], "restTimerFinished");
    assert_eq!(notification["pauseTimeSecs"], 1);
}

#[tokio::test]
async fn test_stop_keep_alive_cancels_timer() {
    let app = TestApp::new();
    let user = app.register_user().await;

    app.post_auth("/api/v1/keep-alive", json!({ "pauseTime": 60 }), &user.token)
        .await;

    let (status, body) = app
        .post_auth("/api/v1/stop-keep-alive", json!({}), &user.token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rest timer stopped");
    assert!(!app.state.rest_timers.is_running(user.id).await);

    let (_, body) = app
        .post_auth("/api/v1/stop-keep-alive", json!({}), &user.token)
        .await;
    assert_eq!(body["message"], "No rest timer running");
}

#[tokio::test]
async fn test_keep_alive_rejects_out_of_range_pause() {
    let app = TestApp::new();
    let user = app.register_user().await;

    for pause in [0, 3601] {
        let (status, _) = app
            .post_auth("/api/v1/keep-alive", json!({ "pauseTime": pause }), &user.token)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert!(!app.state.rest_timers.is_running(user.id).await);
}
