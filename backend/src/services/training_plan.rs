//! Training plan management
//!
//! Plans live inside the owning user's document, so every mutation is a
//! read-modify-write of that document guarded by its version.

use crate::error::ApiError;
use crate::repositories::{UserDocument, UserRepository};
use chrono::Utc;
use tracing::info;
use training_tracker_shared::recommendation::recommend_for_day;
use training_tracker_shared::types::{
    CreateTrainingPlanRequest, TrainingDayResponse, UpdateTrainingPlanRequest,
};
use training_tracker_shared::validation::{
    validate_exercises, validate_title, validate_training_weeks,
};
use training_tracker_shared::{
    Exercise, TrainingPlan, TrainingPlanCardView, TrainingPlanDtoMapper, TrainingPlanEditView,
    TrainingWeek,
};
use uuid::Uuid;
use validator::Validate;

fn plan_not_found(plan_id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Training plan {} not found", plan_id))
}

fn find_plan(user: &UserDocument, plan_id: Uuid) -> Result<&TrainingPlan, ApiError> {
    user.plan(plan_id).ok_or_else(|| plan_not_found(plan_id))
}

fn find_plan_mut(user: &mut UserDocument, plan_id: Uuid) -> Result<&mut TrainingPlan, ApiError> {
    user.plan_mut(plan_id).ok_or_else(|| plan_not_found(plan_id))
}

/// Blank cover strings mean "no cover"
fn cover(raw: Option<String>) -> Option<String> {
    raw.filter(|c| !c.trim().is_empty())
}

/// Training plan service
pub struct TrainingPlanService;

impl TrainingPlanService {
    /// Load one plan of a user
    pub async fn load_plan(
        users: &UserRepository,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<TrainingPlan, ApiError> {
        let user = users.get(user_id).await?;
        find_plan(&user.value, plan_id).cloned()
    }

    /// List a user's plans as cards
    pub async fn list(
        users: &UserRepository,
        mapper: &TrainingPlanDtoMapper,
        user_id: Uuid,
    ) -> Result<Vec<TrainingPlanCardView>, ApiError> {
        let user = users.get(user_id).await?;
        Ok(user
            .value
            .training_plans
            .iter()
            .map(|plan| mapper.card_view(plan))
            .collect())
    }

    /// Get a plan for editing
    pub async fn get(
        users: &UserRepository,
        mapper: &TrainingPlanDtoMapper,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<TrainingPlanEditView, ApiError> {
        let plan = Self::load_plan(users, user_id, plan_id).await?;
        Ok(mapper.edit_view(&plan))
    }

    /// Create a plan of `trainingBlockLength` weeks with `trainingFrequency` empty days each
    pub async fn create(
        users: &UserRepository,
        mapper: &TrainingPlanDtoMapper,
        user_id: Uuid,
        request: CreateTrainingPlanRequest,
    ) -> Result<TrainingPlanEditView, ApiError> {
        request.validate()?;
        validate_title(&request.title).map_err(ApiError::Validation)?;

        let frequency = request.training_frequency as usize;
        let plan = TrainingPlan {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            training_frequency: request.training_frequency,
            last_updated: Utc::now(),
            weight_recommendation_base: request.weight_recommendation_base.unwrap_or_default(),
            training_weeks: (0..request.training_block_length)
                .map(|_| TrainingWeek::with_days(frequency))
                .collect(),
            cover_image_base64: cover(request.cover_image_base64),
            automatic_progression_enabled: request.automatic_progression_enabled,
            last_week_deload_enabled: request.last_week_deload_enabled,
        };

        let view = mapper.edit_view(&plan);
        users
            .update_with(user_id, |user| {
                user.training_plans.push(plan);
                Ok::<_, ApiError>(())
            })
            .await?;

        info!(%user_id, plan_id = %view.id, "Training plan created");
        Ok(view)
    }

    /// Save the editor state of a plan
    pub async fn update(
        users: &UserRepository,
        mapper: &TrainingPlanDtoMapper,
        user_id: Uuid,
        plan_id: Uuid,
        request: UpdateTrainingPlanRequest,
    ) -> Result<TrainingPlanEditView, ApiError> {
        request.validate()?;
        validate_title(&request.title).map_err(ApiError::Validation)?;
        validate_training_weeks(&request.training_weeks).map_err(ApiError::Validation)?;

        users
            .update_with(user_id, |user| {
                let plan = find_plan_mut(user, plan_id)?;
                plan.title = request.title.trim().to_string();
                plan.training_frequency = request.training_frequency;
                plan.training_weeks = request.training_weeks;
                plan.cover_image_base64 = cover(request.cover_image_base64);
                plan.touch();
                Ok(mapper.edit_view(plan))
            })
            .await
    }

    pub async fn delete(users: &UserRepository, user_id: Uuid, plan_id: Uuid) -> Result<(), ApiError> {
        users
            .update_with(user_id, |user| {
                let before = user.training_plans.len();
                user.training_plans.retain(|p| p.id != plan_id);
                if user.training_plans.len() == before {
                    return Err(plan_not_found(plan_id));
                }
                Ok(())
            })
            .await?;

        info!(%user_id, %plan_id, "Training plan deleted");
        Ok(())
    }

    /// A training day with weights recommended from the plan's base week
    pub async fn get_day(
        users: &UserRepository,
        user_id: Uuid,
        plan_id: Uuid,
        week_index: usize,
        day_index: usize,
    ) -> Result<TrainingDayResponse, ApiError> {
        let plan = Self::load_plan(users, user_id, plan_id).await?;
        day_response(&plan, week_index, day_index)
    }

    /// Replace the exercises of one day
    pub async fn update_day(
        users: &UserRepository,
        user_id: Uuid,
        plan_id: Uuid,
        week_index: usize,
        day_index: usize,
        exercises: Vec<Exercise>,
    ) -> Result<TrainingDayResponse, ApiError> {
        validate_exercises(&exercises).map_err(ApiError::Validation)?;

        users
            .update_with(user_id, |user| {
                let plan = find_plan_mut(user, plan_id)?;
                plan.replace_day_exercises(week_index, day_index, exercises)?;
                day_response(plan, week_index, day_index)
            })
            .await
    }

    /// Append a week copied from the current last week
    pub async fn add_week(
        users: &UserRepository,
        mapper: &TrainingPlanDtoMapper,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<TrainingPlanEditView, ApiError> {
        users
            .update_with(user_id, |user| {
                let plan = find_plan_mut(user, plan_id)?;
                if plan.block_length() >= 52 {
                    return Err(ApiError::Validation("A plan has at most 52 weeks".to_string()));
                }
                plan.add_week();
                Ok(mapper.edit_view(plan))
            })
            .await
    }

    /// Remove one week; the last remaining week cannot be removed
    pub async fn remove_week(
        users: &UserRepository,
        mapper: &TrainingPlanDtoMapper,
        user_id: Uuid,
        plan_id: Uuid,
        week_index: usize,
    ) -> Result<TrainingPlanEditView, ApiError> {
        users
            .update_with(user_id, |user| {
                let plan = find_plan_mut(user, plan_id)?;
                plan.remove_week(week_index)?;
                Ok(mapper.edit_view(plan))
            })
            .await
    }
}

fn day_response(
    plan: &TrainingPlan,
    week_index: usize,
    day_index: usize,
) -> Result<TrainingDayResponse, ApiError> {
    let day = plan.day(week_index, day_index).ok_or_else(|| {
        ApiError::NotFound(format!(
            "Day {} of week {} not found",
            day_index, week_index
        ))
    })?;

    Ok(TrainingDayResponse {
        week_index,
        day_index,
        day: day.clone(),
        weight_recommendations: recommend_for_day(plan, week_index, day_index),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::InMemoryDocumentStore;
    use std::sync::Arc;
    use training_tracker_shared::WeightRecommendationBase;

    async fn setup() -> (UserRepository, TrainingPlanDtoMapper, Uuid) {
        let users = UserRepository::new(Arc::new(InMemoryDocumentStore::new()));
        let user = UserDocument::new("plans@example.com", "planner", "hash".to_string());
        users.create(&user).await.unwrap();
        (users, TrainingPlanDtoMapper::default(), user.id)
    }

    fn create_request(weeks: u32, frequency: u32) -> CreateTrainingPlanRequest {
        CreateTrainingPlanRequest {
            title: "Strength block".to_string(),
            training_frequency: frequency,
            training_block_length: weeks,
            weight_recommendation_base: None,
            cover_image_base64: None,
            automatic_progression_enabled: None,
            last_week_deload_enabled: None,
        }
    }

    fn exercise(name: &str, reps: u32, weight: &str) -> Exercise {
        Exercise {
            category: "squat".to_string(),
            exercise: name.to_string(),
            sets: 3,
            reps,
            weight: weight.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_builds_empty_weeks() {
        let (users, mapper, user_id) = setup().await;
        let view = TrainingPlanService::create(&users, &mapper, user_id, create_request(4, 3))
            .await
            .unwrap();

        assert_eq!(view.training_weeks.len(), 4);
        assert!(view.training_weeks.iter().all(|w| w.training_days.len() == 3));
        assert_eq!(view.cover_image_base64, "");

        let cards = TrainingPlanService::list(&users, &mapper, user_id).await.unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].block_length, 4);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_request() {
        let (users, mapper, user_id) = setup().await;
        let err = TrainingPlanService::create(&users, &mapper, user_id, create_request(0, 3))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_day_recommendations_follow_base_week() {
        let (users, mapper, user_id) = setup().await;
        let mut request = create_request(3, 1);
        request.weight_recommendation_base = Some(WeightRecommendationBase::FirstWeek);
        let plan = TrainingPlanService::create(&users, &mapper, user_id, request)
            .await
            .unwrap();

        TrainingPlanService::update_day(&users, user_id, plan.id, 0, 0, vec![exercise("Back Squat", 5, "100")])
            .await
            .unwrap();
        TrainingPlanService::update_day(&users, user_id, plan.id, 1, 0, vec![exercise("Back Squat", 5, "105")])
            .await
            .unwrap();
        let day = TrainingPlanService::update_day(
            &users,
            user_id,
            plan.id,
            2,
            0,
            vec![exercise("Back Squat", 5, ""), exercise("Back Squat", 8, "")],
        )
        .await
        .unwrap();

        assert_eq!(day.weight_recommendations, vec!["100", ""]);

        let first = TrainingPlanService::get_day(&users, user_id, plan.id, 0, 0).await.unwrap();
        assert!(first.weight_recommendations.iter().all(String::is_empty));
    }

    #[tokio::test]
    async fn test_day_out_of_range() {
        let (users, mapper, user_id) = setup().await;
        let plan = TrainingPlanService::create(&users, &mapper, user_id, create_request(1, 2))
            .await
            .unwrap();

        let err = TrainingPlanService::get_day(&users, user_id, plan.id, 0, 5).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = TrainingPlanService::update_day(&users, user_id, plan.id, 3, 0, vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_and_remove_weeks() {
        let (users, mapper, user_id) = setup().await;
        let plan = TrainingPlanService::create(&users, &mapper, user_id, create_request(1, 2))
            .await
            .unwrap();

        let view = TrainingPlanService::add_week(&users, &mapper, user_id, plan.id).await.unwrap();
        assert_eq!(view.training_weeks.len(), 2);

        let view = TrainingPlanService::remove_week(&users, &mapper, user_id, plan.id, 0)
            .await
            .unwrap();
        assert_eq!(view.training_weeks.len(), 1);

        let err = TrainingPlanService::remove_week(&users, &mapper, user_id, plan.id, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let (users, mapper, user_id) = setup().await;
        let request = CreateTrainingPlanRequest {
            title: "   ".to_string(),
            ..create_request(2, 2)
        };
        let err = TrainingPlanService::create(&users, &mapper, user_id, request)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let plan = TrainingPlanService::create(&users, &mapper, user_id, create_request(2, 2))
            .await
            .unwrap();
        let update = UpdateTrainingPlanRequest {
            title: " \t ".to_string(),
            training_frequency: 2,
            training_weeks: vec![TrainingWeek::with_days(2)],
            cover_image_base64: None,
        };
        let err = TrainingPlanService::update(&users, &mapper, user_id, plan.id, update)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let stored = TrainingPlanService::get(&users, &mapper, user_id, plan.id)
            .await
            .unwrap();
        assert_eq!(stored.title, plan.title);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (users, mapper, user_id) = setup().await;
        let plan = TrainingPlanService::create(&users, &mapper, user_id, create_request(2, 2))
            .await
            .unwrap();

        let update = UpdateTrainingPlanRequest {
            title: "Renamed".to_string(),
            training_frequency: 4,
            training_weeks: vec![TrainingWeek::with_days(4)],
            cover_image_base64: Some("aGVsbG8=".to_string()),
        };
        let view = TrainingPlanService::update(&users, &mapper, user_id, plan.id, update)
            .await
            .unwrap();
        assert_eq!(view.title, "Renamed");
        assert_eq!(view.training_weeks.len(), 1);
        assert_eq!(view.cover_image_base64, "aGVsbG8=");

        TrainingPlanService::delete(&users, user_id, plan.id).await.unwrap();
        let err = TrainingPlanService::get(&users, &mapper, user_id, plan.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_plan_is_not_found() {
        let (users, _, user_id) = setup().await;
        let err = TrainingPlanService::delete(&users, user_id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
