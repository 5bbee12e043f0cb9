//! Training Tracker Shared Library
//!
//! Plan model, statistics aggregation and weight recommendations used by
//! the backend and the WASM bindings.

pub mod category;
pub mod dto;
pub mod errors;
pub mod models;
pub mod notifications;
pub mod recommendation;
pub mod statistics;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use category::ExerciseCategory;
pub use dto::{DateFormatter, TrainingPlanCardView, TrainingPlanDtoMapper, TrainingPlanEditView};
pub use errors::*;
pub use models::*;
pub use notifications::{Notification, NotificationEvent};
pub use statistics::{
    ChartData, ChartSeries, RpeProgressionManager, SetProgressionManager, StatisticsKind,
    TonnageManager, TrainingStatisticsManager,
};
pub use types::*;
pub use units::*;
