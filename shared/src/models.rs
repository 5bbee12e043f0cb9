//! Training data model
//!
//! A user owns training plans; a plan is an ordered list of weeks, a week an
//! ordered list of days and a day an ordered list of exercises. Order is
//! significant everywhere: the week index is the week number and the day
//! index is used to line a day up with the same day of an earlier week.
//!
//! Field names follow the JSON the client exchanges (camelCase).

use crate::category::ExerciseCategory;
use crate::errors::TrainingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which earlier week supplies recommended working weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum WeightRecommendationBase {
    /// The week directly before the current one
    #[default]
    LastWeek,
    /// The first week of the plan
    FirstWeek,
}

impl WeightRecommendationBase {
    /// Index of the base week for `week_index`, if there is one
    pub fn base_week_index(&self, week_index: usize) -> Option<usize> {
        if week_index == 0 {
            return None;
        }
        match self {
            WeightRecommendationBase::LastWeek => Some(week_index - 1),
            WeightRecommendationBase::FirstWeek => Some(0),
        }
    }
}

/// A single exercise slot in a training day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(default)]
    pub category: String,
    /// Exercise name
    #[serde(default)]
    pub exercise: String,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
    /// Weight exactly as entered; see [`crate::units::parse_weight`]
    #[serde(default)]
    pub weight: String,
    #[serde(default, rename = "targetRPE")]
    pub target_rpe: String,
    #[serde(default, rename = "actualRPE")]
    pub actual_rpe: String,
    #[serde(default)]
    pub est_max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Exercise {
    /// The normalised category, if the stored string is a known one
    pub fn category(&self) -> Option<ExerciseCategory> {
        ExerciseCategory::parse(&self.category)
    }

    /// Whether this exercise belongs to `category`
    pub fn is_in(&self, category: ExerciseCategory) -> bool {
        self.category() == Some(category)
    }
}

/// One training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDay {
    pub id: Uuid,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl TrainingDay {
    pub fn empty() -> Self {
        Self {
            id: Uuid::new_v4(),
            exercises: Vec::new(),
        }
    }
}

/// One week of a plan
///
/// Older documents carry denormalised per-category totals on the week;
/// unknown fields are ignored on read and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrainingWeek {
    #[serde(default)]
    pub training_days: Vec<TrainingDay>,
}

impl TrainingWeek {
    /// A week with `frequency` empty days
    pub fn with_days(frequency: usize) -> Self {
        Self {
            training_days: (0..frequency).map(|_| TrainingDay::empty()).collect(),
        }
    }

    /// Every exercise of the week, day by day
    pub fn exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.training_days.iter().flat_map(|day| day.exercises.iter())
    }

    /// Build the following week from this one
    ///
    /// Days and exercise slots are copied with fresh day ids. Actual RPE and
    /// notes are cleared; the weight is kept only when `carry_weights` is set.
    pub fn next_week(&self, carry_weights: bool) -> Self {
        let training_days = self
            .training_days
            .iter()
            .map(|day| TrainingDay {
                id: Uuid::new_v4(),
                exercises: day
                    .exercises
                    .iter()
                    .map(|exercise| Exercise {
                        weight: if carry_weights {
                            exercise.weight.clone()
                        } else {
                            String::new()
                        },
                        actual_rpe: String::new(),
                        notes: None,
                        ..exercise.clone()
                    })
                    .collect(),
            })
            .collect();

        Self { training_days }
    }
}

/// A user's training plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    pub id: Uuid,
    pub title: String,
    pub training_frequency: u32,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub weight_recommendation_base: WeightRecommendationBase,
    #[serde(default)]
    pub training_weeks: Vec<TrainingWeek>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic_progression_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_week_deload_enabled: Option<bool>,
}

impl TrainingPlan {
    /// Number of weeks in the plan
    pub fn block_length(&self) -> usize {
        self.training_weeks.len()
    }

    /// Look up a day by week and day index
    pub fn day(&self, week_index: usize, day_index: usize) -> Option<&TrainingDay> {
        self.training_weeks
            .get(week_index)?
            .training_days
            .get(day_index)
    }

    /// Mutable lookup of a day by week and day index
    pub fn day_mut(&mut self, week_index: usize, day_index: usize) -> Option<&mut TrainingDay> {
        self.training_weeks
            .get_mut(week_index)?
            .training_days
            .get_mut(day_index)
    }

    /// Mark the plan as modified now
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// Replace the exercises of one day
    pub fn replace_day_exercises(
        &mut self,
        week_index: usize,
        day_index: usize,
        exercises: Vec<Exercise>,
    ) -> Result<&TrainingDay, TrainingError> {
        let weeks = self.training_weeks.len();
        let week = self
            .training_weeks
            .get_mut(week_index)
            .ok_or(TrainingError::WeekOutOfRange {
                index: week_index,
                len: weeks,
            })?;

        let days = week.training_days.len();
        let day = week
            .training_days
            .get_mut(day_index)
            .ok_or(TrainingError::DayOutOfRange {
                week: week_index,
                index: day_index,
                len: days,
            })?;

        day.exercises = exercises;
        self.last_updated = Utc::now();
        Ok(day)
    }

    /// Append a week built from the current last week
    ///
    /// Weights carry over when automatic progression is enabled. A plan
    /// without weeks gets a week of empty days.
    pub fn add_week(&mut self) -> &TrainingWeek {
        let carry_weights = self.automatic_progression_enabled.unwrap_or(false);
        let week = match self.training_weeks.last() {
            Some(last) => last.next_week(carry_weights),
            None => TrainingWeek::with_days(self.training_frequency as usize),
        };

        self.training_weeks.push(week);
        self.last_updated = Utc::now();
        &self.training_weeks[self.training_weeks.len() - 1]
    }

    /// Remove a week by index, keeping at least one
    pub fn remove_week(&mut self, week_index: usize) -> Result<TrainingWeek, TrainingError> {
        let len = self.training_weeks.len();
        if week_index >= len {
            return Err(TrainingError::WeekOutOfRange {
                index: week_index,
                len,
            });
        }
        if len == 1 {
            return Err(TrainingError::LastWeek);
        }

        let removed = self.training_weeks.remove(week_index);
        self.last_updated = Utc::now();
        Ok(removed)
    }
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Pending friend request stored on the receiving user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub from: Uuid,
    pub username: String,
    pub sent_at: DateTime<Utc>,
}

/// Keys of a browser push subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Browser push subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: PushSubscriptionKeys,
}
