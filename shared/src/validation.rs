//! Input validation functions
//!
//! Request structs carry `validator` derive rules for simple bounds; the
//! checks here cover nested plan content and account fields.

use crate::models::{Exercise, TrainingWeek};
use std::sync::OnceLock;

/// Maximum number of training days in a week
pub const MAX_DAYS_PER_WEEK: usize = 7;
/// Maximum number of exercises in one day
pub const MAX_EXERCISES_PER_DAY: usize = 30;

fn email_regex() -> &'static regex_lite::Regex {
    static REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

fn username_regex() -> &'static regex_lite::Regex {
    static REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").expect("username regex is valid")
    })
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    if !email_regex().is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a display name: 3-32 letters, digits, `_`, `.` or `-`
pub fn validate_username(username: &str) -> Result<(), String> {
    if !username_regex().is_match(username) {
        return Err(
            "Username must be 3-32 characters of letters, digits, '_', '.' or '-'".to_string(),
        );
    }
    Ok(())
}

/// Validate a single exercise slot
pub fn validate_exercise(exercise: &Exercise) -> Result<(), String> {
    if exercise.exercise.trim().is_empty() {
        return Err("Exercise name cannot be empty".to_string());
    }
    if exercise.exercise.len() > 100 {
        return Err("Exercise name too long".to_string());
    }
    if exercise.sets > 100 {
        return Err("Sets must be at most 100".to_string());
    }
    if exercise.reps > 1000 {
        return Err("Reps must be at most 1000".to_string());
    }
    if exercise.weight.len() > 32 {
        return Err("Weight too long".to_string());
    }
    if exercise.est_max.is_nan() || exercise.est_max.is_infinite() || exercise.est_max < 0.0 {
        return Err("Estimated max must be a non-negative number".to_string());
    }
    Ok(())
}

/// Validate the exercises of one day
pub fn validate_exercises(exercises: &[Exercise]) -> Result<(), String> {
    if exercises.len() > MAX_EXERCISES_PER_DAY {
        return Err(format!(
            "A training day holds at most {} exercises",
            MAX_EXERCISES_PER_DAY
        ));
    }
    exercises.iter().try_for_each(validate_exercise)
}

/// Validate every week of a plan
pub fn validate_training_weeks(weeks: &[TrainingWeek]) -> Result<(), String> {
    for (index, week) in weeks.iter().enumerate() {
        if week.training_days.len() > MAX_DAYS_PER_WEEK {
            return Err(format!(
                "Week {} has more than {} training days",
                index + 1,
                MAX_DAYS_PER_WEEK
            ));
        }
        for day in &week.training_days {
            validate_exercises(&day.exercises)
                .map_err(|e| format!("Week {}: {}", index + 1, e))?;
        }
    }
    Ok(())
}

/// Maximum length of a plan title
pub const MAX_TITLE_LENGTH: usize = 100;

/// Validate a plan title as it will be stored, i.e. trimmed
pub fn validate_title(title: &str) -> Result<(), String> {
    let length = title.trim().chars().count();
    if length == 0 || length > MAX_TITLE_LENGTH {
        return Err(format!("Title must be 1-{} characters", MAX_TITLE_LENGTH));
    }
    Ok(())
}

/// Validate a rest timer pause against the configured maximum
pub fn validate_pause_time(seconds: u64, max_seconds: u64) -> Result<(), String> {
    if seconds == 0 {
        return Err("Pause time must be at least 1 second".to_string());
    }
    if seconds > max_seconds {
        return Err(format!("Pause time must be at most {} seconds", max_seconds));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrainingDay;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case("lifter@example.com", true)]
    #[case("", false)]
    #[case("no-at-sign.com", false)]
    #[case("spaces in@example.com", false)]
    fn test_validate_email(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(validate_email(email).is_ok(), valid);
    }

    #[rstest]
    #[case("ironlifter", true)]
    #[case("a.b-c_d", true)]
    #[case("ab", false)]
    #[case("has space", false)]
    fn test_validate_username(#[case] username: &str, #[case] valid: bool) {
        assert_eq!(validate_username(username).is_ok(), valid);
    }

    #[rstest]
    #[case("Strength block", true)]
    #[case("  Peaking  ", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("\t\n", false)]
    fn test_validate_title(#[case] title: &str, #[case] valid: bool) {
        assert_eq!(validate_title(title).is_ok(), valid);
    }

    #[test]
    fn test_validate_title_length_counts_trimmed_chars() {
        let padded = format!("  {}  ", "a".repeat(MAX_TITLE_LENGTH));
        assert!(validate_title(&padded).is_ok());
        assert!(validate_title(&"ä".repeat(MAX_TITLE_LENGTH)).is_ok());
        assert!(validate_title(&"a".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }

    fn exercise() -> Exercise {
        Exercise {
            category: "bench".to_string(),
            exercise: "Bench Press".to_string(),
            sets: 4,
            reps: 8,
            weight: "80".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_exercise() {
        assert!(validate_exercise(&exercise()).is_ok());

        let unnamed = Exercise {
            exercise: " ".to_string(),
            ..exercise()
        };
        assert!(validate_exercise(&unnamed).is_err());

        let negative_max = Exercise {
            est_max: -1.0,
            ..exercise()
        };
        assert!(validate_exercise(&negative_max).is_err());
    }

    #[test]
    fn test_validate_training_weeks_reports_week() {
        let week = TrainingWeek {
            training_days: vec![TrainingDay {
                id: Uuid::new_v4(),
                exercises: vec![Exercise {
                    sets: 500,
                    ..exercise()
                }],
            }],
        };
        let err = validate_training_weeks(&[TrainingWeek::with_days(3), week]).unwrap_err();
        assert!(err.starts_with("Week 2"));
    }

    #[test]
    fn test_validate_training_weeks_limits_days() {
        assert!(validate_training_weeks(&[TrainingWeek::with_days(8)]).is_err());
        assert!(validate_training_weeks(&[TrainingWeek::with_days(7)]).is_ok());
    }

    #[test]
    fn test_validate_pause_time() {
        assert!(validate_pause_time(0, 600).is_err());
        assert!(validate_pause_time(90, 600).is_ok());
        assert!(validate_pause_time(601, 600).is_err());
    }
}
