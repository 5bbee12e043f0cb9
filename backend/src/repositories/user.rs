//! User document repository
//!
//! A user is persisted as one document with their training plans, friends,
//! pending friend requests and push subscriptions nested inside.

use crate::dao::{DaoResult, Document, DocumentStore, GenericDao, Versioned};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use training_tracker_shared::{
    FriendRequest, PushSubscription, TrainingPlan, UserProfile, UserSummary,
};
use uuid::Uuid;

/// Stored user document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub id: Uuid,
    /// Lowercased; unique across users
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub training_plans: Vec<TrainingPlan>,
    #[serde(default)]
    pub friends: Vec<Uuid>,
    #[serde(default)]
    pub friend_requests: Vec<FriendRequest>,
    #[serde(default)]
    pub push_subscriptions: Vec<PushSubscription>,
}

impl Document for UserDocument {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl UserDocument {
    pub fn new(email: &str, username: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            username: username.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
            training_plans: Vec::new(),
            friends: Vec::new(),
            friend_requests: Vec::new(),
            push_subscriptions: Vec::new(),
        }
    }

    pub fn plan(&self, plan_id: Uuid) -> Option<&TrainingPlan> {
        self.training_plans.iter().find(|p| p.id == plan_id)
    }

    pub fn plan_mut(&mut self, plan_id: Uuid) -> Option<&mut TrainingPlan> {
        self.training_plans.iter_mut().find(|p| p.id == plan_id)
    }

    pub fn is_friend(&self, other: Uuid) -> bool {
        self.friends.contains(&other)
    }

    pub fn has_request_from(&self, other: Uuid) -> bool {
        self.friend_requests.iter().any(|r| r.from == other)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

/// Emails are matched case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User repository over the document store
#[derive(Clone)]
pub struct UserRepository {
    dao: GenericDao<UserDocument>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            dao: GenericDao::new(store),
        }
    }

    pub async fn create(&self, user: &UserDocument) -> DaoResult<Versioned<UserDocument>> {
        self.dao.create(user).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> DaoResult<Option<Versioned<UserDocument>>> {
        self.dao.find_one(id).await
    }

    /// Find by id; a missing user is [`crate::dao::DaoError::NotFound`]
    pub async fn get(&self, id: Uuid) -> DaoResult<Versioned<UserDocument>> {
        self.dao.get(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<Option<Versioned<UserDocument>>> {
        Ok(self
            .dao
            .find_by_field("email", normalize_email(email))
            .await?
            .into_iter()
            .next())
    }

    pub async fn email_exists(&self, email: &str) -> DaoResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Write back a user read at `user.version`, stamping `updatedAt`
    pub async fn save(&self, mut user: Versioned<UserDocument>) -> DaoResult<Versioned<UserDocument>> {
        user.value.updated_at = Utc::now();
        self.dao.update(&user).await
    }

    /// Load, modify and save a user in one optimistic round
    ///
    /// A concurrent write between load and save surfaces as a version
    /// conflict; nothing is retried.
    pub async fn update_with<R, E, F>(&self, id: Uuid, f: F) -> Result<R, E>
    where
        E: From<crate::dao::DaoError>,
        F: FnOnce(&mut UserDocument) -> Result<R, E>,
    {
        let mut user = self.get(id).await?;
        let result = f(&mut user.value)?;
        self.save(user).await?;
        Ok(result)
    }

    pub async fn delete(&self, id: Uuid) -> DaoResult<bool> {
        self.dao.delete(id).await
    }
}
