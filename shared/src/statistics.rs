//! Training statistics aggregation
//!
//! Walks a plan week by week and reduces the exercises of each requested
//! category to one number per week. The reduction is pluggable through
//! [`WeeklyAggregator`]; set counts, tonnage and average RPE are provided.
//!
//! All functions here are pure: the plan is borrowed, never modified, and
//! the result is a fresh [`ChartData`].

use crate::category::ExerciseCategory;
use crate::models::{Exercise, TrainingPlan};
use crate::units::{parse_rpe, parse_weight_kg};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Which statistic to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticsKind {
    Sets,
    Tonnage,
    Rpe,
}

impl StatisticsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatisticsKind::Sets => "sets",
            StatisticsKind::Tonnage => "tonnage",
            StatisticsKind::Rpe => "rpe",
        }
    }
}

impl std::str::FromStr for StatisticsKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sets" => Ok(StatisticsKind::Sets),
            "tonnage" => Ok(StatisticsKind::Tonnage),
            "rpe" => Ok(StatisticsKind::Rpe),
            _ => Err(format!("Unknown statistics kind: {}", s)),
        }
    }
}

/// One labelled series
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// Per-category weekly series
///
/// Serialises as a JSON object `{ label: [values...] }` keeping insertion
/// order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    series: Vec<ChartSeries>,
}

impl ChartData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a series; callers pass each label once
    pub fn push(&mut self, label: String, values: Vec<f64>) {
        debug_assert!(self.get(&label).is_none(), "duplicate chart label {}", label);
        self.series.push(ChartSeries { label, values });
    }

    pub fn get(&self, label: &str) -> Option<&[f64]> {
        self.series
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.values.as_slice())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Labels in insertion order
    pub fn labels(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl Serialize for ChartData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.series.len()))?;
        for series in &self.series {
            map.serialize_entry(&series.label, &series.values)?;
        }
        map.end()
    }
}

/// Reduces the exercises of one category in one week to a single number
pub trait WeeklyAggregator {
    fn aggregate<'a, I>(&self, exercises: I) -> f64
    where
        I: Iterator<Item = &'a Exercise>;
}

/// Total number of sets
#[derive(Debug, Clone, Copy, Default)]
pub struct SetCount;

impl WeeklyAggregator for SetCount {
    fn aggregate<'a, I>(&self, exercises: I) -> f64
    where
        I: Iterator<Item = &'a Exercise>,
    {
        exercises.map(|e| f64::from(e.sets)).sum()
    }
}

/// Total volume in kilograms: sets × reps × weight
///
/// Exercises whose weight does not parse contribute nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tonnage;

impl WeeklyAggregator for Tonnage {
    fn aggregate<'a, I>(&self, exercises: I) -> f64
    where
        I: Iterator<Item = &'a Exercise>,
    {
        exercises
            .filter_map(|e| {
                parse_weight_kg(&e.weight).map(|kg| f64::from(e.sets) * f64::from(e.reps) * kg)
            })
            .sum()
    }
}

/// Mean actual RPE over exercises that have one; 0 when none do
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageRpe;

impl WeeklyAggregator for AverageRpe {
    fn aggregate<'a, I>(&self, exercises: I) -> f64
    where
        I: Iterator<Item = &'a Exercise>,
    {
        let (sum, count) = exercises
            .filter_map(|e| parse_rpe(&e.actual_rpe))
            .fold((0.0, 0usize), |(sum, count), rpe| (sum + rpe, count + 1));

        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }
}

/// Base statistics manager bound to one plan
#[derive(Debug, Clone, Copy)]
pub struct TrainingStatisticsManager<'a> {
    plan: &'a TrainingPlan,
}

impl<'a> TrainingStatisticsManager<'a> {
    pub fn new(plan: &'a TrainingPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &'a TrainingPlan {
        self.plan
    }

    /// One value per week for a single category
    pub fn weekly_series<A: WeeklyAggregator>(
        &self,
        aggregator: &A,
        category: ExerciseCategory,
    ) -> Vec<f64> {
        self.plan
            .training_weeks
            .iter()
            .map(|week| aggregator.aggregate(week.exercises().filter(|e| e.is_in(category))))
            .collect()
    }

    /// Series for every requested category
    ///
    /// Unknown category names are skipped without error; duplicates are
    /// computed once, keyed in first-seen order.
    pub fn aggregate<A: WeeklyAggregator, S: AsRef<str>>(
        &self,
        aggregator: &A,
        requested: &[S],
    ) -> ChartData {
        let mut chart = ChartData::new();
        for category in ExerciseCategory::parse_all(requested) {
            chart.push(category.label(), self.weekly_series(aggregator, category));
        }
        chart
    }

    /// Dispatch on a [`StatisticsKind`]
    pub fn calculate<S: AsRef<str>>(&self, kind: StatisticsKind, requested: &[S]) -> ChartData {
        match kind {
            StatisticsKind::Sets => self.aggregate(&SetCount, requested),
            StatisticsKind::Tonnage => self.aggregate(&Tonnage, requested),
            StatisticsKind::Rpe => self.aggregate(&AverageRpe, requested),
        }
    }
}

/// Weekly set counts per category
#[derive(Debug, Clone, Copy)]
pub struct SetProgressionManager<'a> {
    base: TrainingStatisticsManager<'a>,
}

impl<'a> SetProgressionManager<'a> {
    pub fn new(plan: &'a TrainingPlan) -> Self {
        Self {
            base: TrainingStatisticsManager::new(plan),
        }
    }

    pub fn calculate<S: AsRef<str>>(&self, exercise_categories: &[S]) -> ChartData {
        self.base.aggregate(&SetCount, exercise_categories)
    }
}

/// Weekly tonnage per category
#[derive(Debug, Clone, Copy)]
pub struct TonnageManager<'a> {
    base: TrainingStatisticsManager<'a>,
}

impl<'a> TonnageManager<'a> {
    pub fn new(plan: &'a TrainingPlan) -> Self {
        Self {
            base: TrainingStatisticsManager::new(plan),
        }
    }

    pub fn calculate<S: AsRef<str>>(&self, exercise_categories: &[S]) -> ChartData {
        self.base.aggregate(&Tonnage, exercise_categories)
    }
}

/// Weekly average RPE per category
#[derive(Debug, Clone, Copy)]
pub struct RpeProgressionManager<'a> {
    base: TrainingStatisticsManager<'a>,
}

impl<'a> RpeProgressionManager<'a> {
    pub fn new(plan: &'a TrainingPlan) -> Self {
        Self {
            base: TrainingStatisticsManager::new(plan),
        }
    }

    pub fn calculate<S: AsRef<str>>(&self, exercise_categories: &[S]) -> ChartData {
        self.base.aggregate(&AverageRpe, exercise_categories)
    }
}
