//! Error types shared between the backend and the browser bindings

use thiserror::Error;

/// Errors raised while editing a training plan
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrainingError {
    #[error("Week {index} does not exist (plan has {len} weeks)")]
    WeekOutOfRange { index: usize, len: usize },

    #[error("Day {index} does not exist in week {week} ({len} days)")]
    DayOutOfRange { week: usize, index: usize, len: usize },

    #[error("A training plan needs at least one week")]
    LastWeek,

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Authentication error types
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing token")]
    MissingToken,
}
