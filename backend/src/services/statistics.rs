//! Training statistics for charts

use super::training_plan::TrainingPlanService;
use crate::error::ApiError;
use crate::repositories::UserRepository;
use tracing::debug;
use training_tracker_shared::{ChartData, StatisticsKind, TrainingStatisticsManager};
use uuid::Uuid;

pub struct StatisticsService;

impl StatisticsService {
    /// Weekly series of `kind` for the requested categories of one plan
    ///
    /// Unknown category names are ignored; an empty request yields an
    /// empty chart.
    pub async fn calculate(
        users: &UserRepository,
        user_id: Uuid,
        plan_id: Uuid,
        kind: StatisticsKind,
        categories: &[String],
    ) -> Result<ChartData, ApiError> {
        let plan = TrainingPlanService::load_plan(users, user_id, plan_id).await?;
        let chart = TrainingStatisticsManager::new(&plan).calculate(kind, categories);

        metrics::counter!("statistics_requests_total", "kind" => kind.as_str()).increment(1);
        debug!(%plan_id, kind = kind.as_str(), series = chart.len(), "Statistics calculated");
        Ok(chart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::InMemoryDocumentStore;
    use crate::repositories::UserDocument;
    use chrono::Utc;
    use std::sync::Arc;
    use training_tracker_shared::{Exercise, TrainingDay, TrainingPlan, TrainingWeek};

    fn week(exercises: Vec<Exercise>) -> TrainingWeek {
        TrainingWeek {
            training_days: vec![TrainingDay {
                id: Uuid::new_v4(),
                exercises,
            }],
        }
    }

    fn exercise(category: &str, sets: u32, weight: &str, rpe: &str) -> Exercise {
        Exercise {
            category: category.to_string(),
            exercise: format!("{} work", category),
            sets,
            reps: 5,
            weight: weight.to_string(),
            actual_rpe: rpe.to_string(),
            ..Default::default()
        }
    }

    async fn setup() -> (UserRepository, Uuid, Uuid) {
        let users = UserRepository::new(Arc::new(InMemoryDocumentStore::new()));
        let mut user = UserDocument::new("stats@example.com", "stats", "hash".to_string());
        let plan = TrainingPlan {
            id: Uuid::new_v4(),
            title: "Volume".to_string(),
            training_frequency: 1,
            last_updated: Utc::now(),
            weight_recommendation_base: Default::default(),
            training_weeks: vec![
                week(vec![exercise("squat", 3, "100", "7"), exercise("bench", 4, "60kg", "8")]),
                week(vec![exercise("squat", 5, "102.5", "8"), exercise("Flying", 9, "", "")]),
            ],
            cover_image_base64: None,
            automatic_progression_enabled: None,
            last_week_deload_enabled: None,
        };
        let plan_id = plan.id;
        user.training_plans.push(plan);
        users.create(&user).await.unwrap();
        (users, user.id, plan_id)
    }

    #[tokio::test]
    async fn test_set_progression() {
        let (users, user_id, plan_id) = setup().await;
        let categories = vec!["Squat".to_string(), "bench".to_string(), "Flying".to_string()];
        let chart = StatisticsService::calculate(&users, user_id, plan_id, StatisticsKind::Sets, &categories)
            .await
            .unwrap();

        assert_eq!(chart.get("Squat"), Some(&[3.0, 5.0][..]));
        assert_eq!(chart.get("Bench"), Some(&[4.0, 0.0][..]));
        assert!(!chart.contains("Flying"));
    }

    #[tokio::test]
    async fn test_tonnage() {
        let (users, user_id, plan_id) = setup().await;
        let chart = StatisticsService::calculate(
            &users,
            user_id,
            plan_id,
            StatisticsKind::Tonnage,
            &["squat".to_string()],
        )
        .await
        .unwrap();

        assert_eq!(chart.get("Squat"), Some(&[1500.0, 2562.5][..]));
    }

    #[tokio::test]
    async fn test_unknown_plan() {
        let (users, user_id, _) = setup().await;
        let err = StatisticsService::calculate(&users, user_id, Uuid::new_v4(), StatisticsKind::Rpe, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
