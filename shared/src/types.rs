//! API request and response types

use crate::models::{Exercise, TrainingDay, TrainingWeek, WeightRecommendationBase};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Authentication
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Refresh token request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Training Plans
// ============================================================================

/// Create a training plan with empty weeks
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrainingPlanRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    #[validate(range(min = 1, max = 7, message = "Training frequency must be 1-7 days per week"))]
    pub training_frequency: u32,
    #[validate(range(min = 1, max = 52, message = "Block length must be 1-52 weeks"))]
    pub training_block_length: u32,
    #[serde(default)]
    pub weight_recommendation_base: Option<WeightRecommendationBase>,
    #[serde(default)]
    pub cover_image_base64: Option<String>,
    #[serde(default)]
    pub automatic_progression_enabled: Option<bool>,
    #[serde(default)]
    pub last_week_deload_enabled: Option<bool>,
}

/// Save the plan editor state
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrainingPlanRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
    #[validate(range(min = 1, max = 7, message = "Training frequency must be 1-7 days per week"))]
    pub training_frequency: u32,
    #[validate(length(min = 1, max = 52, message = "A plan has 1-52 weeks"))]
    pub training_weeks: Vec<TrainingWeek>,
    #[serde(default)]
    pub cover_image_base64: Option<String>,
}

/// Replace the exercises of one training day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrainingDayRequest {
    pub exercises: Vec<Exercise>,
}

/// A training day with weight recommendations aligned to its exercises
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDayResponse {
    pub week_index: usize,
    pub day_index: usize,
    pub day: TrainingDay,
    pub weight_recommendations: Vec<String>,
}

/// Statistics query: comma separated category names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsQuery {
    #[serde(default, alias = "exerciseCategories")]
    pub categories: Option<String>,
}

impl StatisticsQuery {
    /// Requested categories, split and trimmed; blanks removed
    pub fn category_list(&self) -> Vec<String> {
        self.categories
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect()
    }
}

// ============================================================================
// Rest Timer
// ============================================================================

/// Start or refresh the rest timer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeepAliveRequest {
    /// Rest duration in seconds
    pub pause_time: u64,
}

// ============================================================================
// Friendships
// ============================================================================

/// Send a friend request to the user with this email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFriendRequest {
    pub email: String,
}

// ============================================================================
// Push Subscriptions
// ============================================================================

/// Remove a push subscription by endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovePushSubscriptionRequest {
    pub endpoint: String,
}
