//! Common test utilities for integration tests
//!
//! Every [`TestApp`] runs the full router over a fresh in-memory store.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::{faker::internet::en::SafeEmail, Fake};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use training_tracker_backend::{
    config::{AppConfig, StorageBackend},
    dao::InMemoryDocumentStore,
    routes,
    state::AppState,
};
use uuid::Uuid;

pub const PASSWORD: &str = "SecurePassword123!";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

/// A registered user with a valid access token
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        let state = AppState::new(store, config).expect("Failed to build app state");
        let app = routes::create_router(state.clone());
        Self { app, state }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, body)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(body), None).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, None, Some(token)).await
    }

    pub async fn post_auth(&self, path: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(body), Some(token)).await
    }

    pub async fn put_auth(&self, path: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(body), Some(token)).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, None, Some(token)).await
    }

    /// Register a user with a random email and return its tokens
    pub async fn register_user(&self) -> TestUser {
        let tag = Uuid::new_v4().simple().to_string();
        // generated addresses repeat, so make them unique per user
        let email = format!("{}.{}", &tag[..6], SafeEmail().fake::<String>());
        let username = format!("user_{}", &tag[..8]);

        let (status, body) = self
            .post(
                "/api/v1/auth/register",
                json!({ "email": email, "username": username, "password": PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let token = body["access_token"].as_str().unwrap().to_string();
        let (status, profile) = self.get_auth("/api/v1/auth/me", &token).await;
        assert_eq!(status, StatusCode::OK);

        TestUser {
            id: profile["id"].as_str().unwrap().parse().unwrap(),
            email: profile["email"].as_str().unwrap().to_string(),
            username,
            token,
        }
    }

    /// Create a plan and return its edit view
    pub async fn create_plan(&self, token: &str, frequency: u32, weeks: u32) -> Value {
        let (status, body) = self
            .post_auth(
                "/api/v1/training-plans",
                json!({
                    "title": "Strength Block",
                    "trainingFrequency": frequency,
                    "trainingBlockLength": weeks,
                }),
                token,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create plan failed: {}", body);
        body
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    config.jwt.secret = "test-secret-key-for-testing-only-32chars".to_string();
    config
}

pub fn exercise(category: &str, name: &str, sets: u32, reps: u32, weight: &str, rpe: &str) -> Value {
    json!({
        "category": category,
        "exercise": name,
        "sets": sets,
        "reps": reps,
        "weight": weight,
        "targetRPE": "",
        "actualRPE": rpe,
        "estMax": 0.0,
    })
}
