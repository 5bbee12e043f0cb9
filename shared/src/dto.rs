//! Training plan view projections

use crate::models::{TrainingPlan, TrainingWeek};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default format for `lastUpdated` on card views
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Formats timestamps for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    format: String,
}

impl DateFormatter {
    /// Create a formatter from a chrono `strftime` pattern
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// Create a formatter, rejecting patterns chrono cannot render
    pub fn try_new(format: &str) -> Result<Self, String> {
        let invalid = StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
        if invalid || format.is_empty() {
            return Err(format!("Invalid date format: {:?}", format));
        }
        Ok(Self::new(format))
    }

    pub fn format(&self, timestamp: &DateTime<Utc>) -> String {
        timestamp.format(&self.format).to_string()
    }

    pub fn pattern(&self) -> &str {
        &self.format
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMAT)
    }
}

/// Summary of a plan for list/overview screens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanCardView {
    pub id: Uuid,
    pub title: String,
    pub block_length: usize,
    pub training_frequency: u32,
    pub last_updated: String,
    pub cover_image_base64: String,
}

/// Everything the plan editor needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanEditView {
    pub id: Uuid,
    pub title: String,
    pub training_frequency: u32,
    pub training_weeks: Vec<TrainingWeek>,
    pub cover_image_base64: String,
}

/// Projects plans into view DTOs
#[derive(Debug, Clone, Default)]
pub struct TrainingPlanDtoMapper {
    formatter: DateFormatter,
}

impl TrainingPlanDtoMapper {
    pub fn new(formatter: DateFormatter) -> Self {
        Self { formatter }
    }

    pub fn formatter(&self) -> &DateFormatter {
        &self.formatter
    }

    pub fn card_view(&self, plan: &TrainingPlan) -> TrainingPlanCardView {
        TrainingPlanCardView {
            id: plan.id,
            title: plan.title.clone(),
            block_length: plan.block_length(),
            training_frequency: plan.training_frequency,
            last_updated: self.formatter.format(&plan.last_updated),
            cover_image_base64: plan.cover_image_base64.clone().unwrap_or_default(),
        }
    }

    pub fn edit_view(&self, plan: &TrainingPlan) -> TrainingPlanEditView {
        TrainingPlanEditView {
            id: plan.id,
            title: plan.title.clone(),
            training_frequency: plan.training_frequency,
            training_weeks: plan.training_weeks.clone(),
            cover_image_base64: plan.cover_image_base64.clone().unwrap_or_default(),
        }
    }
}
