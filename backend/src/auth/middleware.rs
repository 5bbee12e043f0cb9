//! Authentication extractors
//!
//! Handlers take [`AuthUser`] to require a bearer token. The WebSocket
//! endpoint cannot send headers from a browser, so it authenticates with a
//! `?token=` query parameter through [`authenticate_token`].

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRef,
    http::{header::AUTHORIZATION, request::Parts},
};
use training_tracker_shared::AuthError;
use uuid::Uuid;

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Validate an access token and return the user it belongs to
pub fn authenticate_token(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = state.jwt().validate_access_token(token)?;
    Ok(AuthUser {
        user_id: claims.sub,
    })
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization format".to_string()))?;

        authenticate_token(&app_state, token)
    }
}
