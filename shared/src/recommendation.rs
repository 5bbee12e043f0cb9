//! Week-over-week weight recommendations
//!
//! An exercise slot is identified by its name and rep count. For every
//! exercise of the current day we look for the same slot in an earlier day
//! and suggest the weight recorded there.

use crate::models::{Exercise, TrainingPlan};

/// Recommend a weight for each current exercise
///
/// The output is aligned with `current`. A previous exercise matches when
/// both name and reps are equal; the first match in `previous` wins.
/// Unmatched slots get an empty string.
pub fn recommend_weights(current: &[Exercise], previous: &[Exercise]) -> Vec<String> {
    current
        .iter()
        .map(|exercise| {
            previous
                .iter()
                .find(|candidate| {
                    candidate.exercise == exercise.exercise && candidate.reps == exercise.reps
                })
                .map(|candidate| candidate.weight.clone())
                .unwrap_or_default()
        })
        .collect()
}

/// Recommendations for one day of a plan
///
/// The earlier day is the same day index in the week selected by the plan's
/// recommendation base. Without such a day every slot gets an empty string;
/// an out-of-range current day yields an empty list.
pub fn recommend_for_day(plan: &TrainingPlan, week_index: usize, day_index: usize) -> Vec<String> {
    let Some(day) = plan.day(week_index, day_index) else {
        return Vec::new();
    };

    let previous = plan
        .weight_recommendation_base
        .base_week_index(week_index)
        .and_then(|base| plan.day(base, day_index))
        .map(|base_day| base_day.exercises.as_slice())
        .unwrap_or(&[]);

    recommend_weights(&day.exercises, previous)
}
