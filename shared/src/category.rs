//! Exercise category catalogue
//!
//! Categories arrive from the client as free-form strings ("squat", "Bench",
//! "overhead_press"). Everything that compares categories goes through
//! [`ExerciseCategory::parse`] so that request strings and stored exercise
//! categories are normalised the same way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known exercise categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    Squat,
    Bench,
    Deadlift,
    #[serde(rename = "overhead press")]
    OverheadPress,
    Chest,
    Back,
    Shoulder,
    Triceps,
    Biceps,
    Legs,
    Glutes,
    Hamstrings,
    Quads,
    Calves,
    Abs,
}

impl ExerciseCategory {
    /// Every category, in catalogue order
    pub const ALL: [ExerciseCategory; 15] = [
        ExerciseCategory::Squat,
        ExerciseCategory::Bench,
        ExerciseCategory::Deadlift,
        ExerciseCategory::OverheadPress,
        ExerciseCategory::Chest,
        ExerciseCategory::Back,
        ExerciseCategory::Shoulder,
        ExerciseCategory::Triceps,
        ExerciseCategory::Biceps,
        ExerciseCategory::Legs,
        ExerciseCategory::Glutes,
        ExerciseCategory::Hamstrings,
        ExerciseCategory::Quads,
        ExerciseCategory::Calves,
        ExerciseCategory::Abs,
    ];

    /// Canonical lowercase name, as stored on exercises
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::Squat => "squat",
            ExerciseCategory::Bench => "bench",
            ExerciseCategory::Deadlift => "deadlift",
            ExerciseCategory::OverheadPress => "overhead press",
            ExerciseCategory::Chest => "chest",
            ExerciseCategory::Back => "back",
            ExerciseCategory::Shoulder => "shoulder",
            ExerciseCategory::Triceps => "triceps",
            ExerciseCategory::Biceps => "biceps",
            ExerciseCategory::Legs => "legs",
            ExerciseCategory::Glutes => "glutes",
            ExerciseCategory::Hamstrings => "hamstrings",
            ExerciseCategory::Quads => "quads",
            ExerciseCategory::Calves => "calves",
            ExerciseCategory::Abs => "abs",
        }
    }

    /// Capitalised label used as the key of chart series
    pub fn label(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Normalise a free-form category string
    ///
    /// Matching is case-insensitive, ignores surrounding whitespace and
    /// treats `_` and `-` like spaces. Returns `None` for anything outside
    /// the catalogue.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw
            .trim()
            .to_lowercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
    }

    /// Normalise a list of requested categories
    ///
    /// Unknown entries are dropped and duplicates collapse onto their first
    /// occurrence, so the result order is the first-seen order.
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Vec<Self> {
        let mut categories = Vec::with_capacity(raw.len());
        for value in raw {
            if let Some(category) = Self::parse(value.as_ref()) {
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
        }
        categories
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExerciseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown exercise category: {}", s))
    }
}
