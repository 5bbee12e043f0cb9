//! Weight units and defensive parsing of stored weight strings
//!
//! Exercise weights are stored as the string the user typed ("100",
//! "102,5", "225 lbs"). The stored value is never rewritten; numeric
//! calculations parse it here and work in kilograms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Weight unit of a logged value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
    Stone,
}

impl WeightUnit {
    /// Convert from this unit to kilograms
    pub fn to_kg(&self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value * 0.453592,
            WeightUnit::Stone => value * 6.35029,
        }
    }

    /// Get the unit abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
            WeightUnit::Stone => "st",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" => Ok(WeightUnit::Kg),
            "lbs" | "lb" | "pound" | "pounds" => Ok(WeightUnit::Lbs),
            "st" | "stone" | "stones" => Ok(WeightUnit::Stone),
            _ => Err(format!("Unknown weight unit: {}", s)),
        }
    }
}

/// A weight string split into value and unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedWeight {
    pub value: f64,
    pub unit: WeightUnit,
}

impl ParsedWeight {
    /// The parsed value in kilograms
    pub fn kilograms(&self) -> f64 {
        self.unit.to_kg(self.value)
    }
}

fn weight_pattern() -> &'static regex_lite::Regex {
    static PATTERN: OnceLock<regex_lite::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex_lite::Regex::new(r"^([0-9]+(?:[.,][0-9]+)?)\s*([A-Za-z]*)$")
            .expect("weight pattern is a valid regex")
    })
}

/// Parse a stored weight string
///
/// Accepts an optional unit suffix and either `.` or `,` as the decimal
/// separator. Returns `None` for empty, negative or unparseable input;
/// a missing unit means kilograms.
pub fn parse_weight(raw: &str) -> Option<ParsedWeight> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let captures = weight_pattern().captures(trimmed)?;
    let value: f64 = captures.get(1)?.as_str().replace(',', ".").parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    let unit = match captures.get(2).map(|m| m.as_str()) {
        None | Some("") => WeightUnit::Kg,
        Some(suffix) => suffix.parse().ok()?,
    };

    Some(ParsedWeight { value, unit })
}

/// Parse a stored weight string straight to kilograms
pub fn parse_weight_kg(raw: &str) -> Option<f64> {
    parse_weight(raw).map(|w| w.kilograms())
}

/// Parse an RPE string such as "8", "8.5" or "8,5"
///
/// RPE lives on a 1-10 scale; anything outside is treated as no value.
pub fn parse_rpe(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    if value.is_finite() && (1.0..=10.0).contains(&value) {
        Some(value)
    } else {
        None
    }
}
