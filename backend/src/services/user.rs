//! User service for authentication and user management

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{UserDocument, UserRepository};
use tracing::info;
use training_tracker_shared::types::{AuthTokens, UserProfile};
use training_tracker_shared::validation::{validate_email, validate_password, validate_username};
use training_tracker_shared::AuthError;
use uuid::Uuid;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    fn issue_tokens(jwt_service: &JwtService, user_id: Uuid) -> Result<AuthTokens, ApiError> {
        Ok(AuthTokens {
            access_token: jwt_service.generate_access_token(user_id)?,
            refresh_token: jwt_service.generate_refresh_token(user_id)?,
            token_type: "Bearer".to_string(),
            expires_in: jwt_service.access_token_expiry_secs(),
        })
    }

    /// Register a new user
    pub async fn register(
        users: &UserRepository,
        jwt_service: &JwtService,
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        validate_email(email.trim()).map_err(ApiError::Validation)?;
        validate_username(username).map_err(ApiError::Validation)?;
        validate_password(password).map_err(ApiError::Validation)?;

        if users.email_exists(email).await? {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash(password.to_string()).await?;
        let user = UserDocument::new(email, username, password_hash);
        users.create(&user).await?;

        info!(user_id = %user.id, "User registered");
        Self::issue_tokens(jwt_service, user.id)
    }

    /// Login with email and password
    pub async fn login(
        users: &UserRepository,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        let user = users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid =
            PasswordService::verify(password.to_string(), user.value.password_hash.clone()).await?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        Self::issue_tokens(jwt_service, user.value.id)
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(
        users: &UserRepository,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let claims = jwt_service.validate_refresh_token(refresh_token)?;

        if users.find_by_id(claims.sub).await?.is_none() {
            return Err(ApiError::Unauthorized("User not found".to_string()));
        }

        Self::issue_tokens(jwt_service, claims.sub)
    }

    /// Get user profile
    pub async fn get_profile(users: &UserRepository, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user = users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.value.profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::InMemoryDocumentStore;
    use std::sync::Arc;

    fn setup() -> (UserRepository, JwtService) {
        (
            UserRepository::new(Arc::new(InMemoryDocumentStore::new())),
            JwtService::new("test-secret", 3600, 604800),
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (users, jwt) = setup();
        let tokens = UserService::register(&users, &jwt, "new@example.com", "newbie", "password123")
            .await
            .unwrap();
        assert_eq!(tokens.token_type, "Bearer");

        let login = UserService::login(&users, &jwt, "NEW@example.com", "password123")
            .await
            .unwrap();
        let claims = jwt.validate_access_token(&login.access_token).unwrap();
        let profile = UserService::get_profile(&users, claims.sub).await.unwrap();
        assert_eq!(profile.email, "new@example.com");
        assert_eq!(profile.username, "newbie");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let (users, jwt) = setup();
        UserService::register(&users, &jwt, "dup@example.com", "first", "password123")
            .await
            .unwrap();
        let err = UserService::register(&users, &jwt, "Dup@Example.com", "second", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_wrong_password_unauthorized() {
        let (users, jwt) = setup();
        UserService::register(&users, &jwt, "pw@example.com", "pw_user", "password123")
            .await
            .unwrap();
        let err = UserService::login(&users, &jwt, "pw@example.com", "nope-nope")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let (users, jwt) = setup();
        let tokens = UserService::register(&users, &jwt, "r@example.com", "refresher", "password123")
            .await
            .unwrap();

        assert!(UserService::refresh_token(&users, &jwt, &tokens.refresh_token).await.is_ok());
        assert!(UserService::refresh_token(&users, &jwt, &tokens.access_token).await.is_err());
    }
}
