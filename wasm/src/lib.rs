//! Training Tracker WASM Module
//!
//! Browser bindings for the plan calculations, so the client can redraw
//! charts and recommendations while a plan is being edited. Values cross
//! the boundary as JSON strings in the same shape the API uses.

use serde::de::DeserializeOwned;
use training_tracker_shared::recommendation;
use training_tracker_shared::{
    parse_weight_kg, Exercise, StatisticsKind, TrainingPlan, TrainingStatisticsManager,
};
use wasm_bindgen::prelude::*;

fn from_json<T: DeserializeOwned>(what: &str, json: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {}: {}", what, e))
}

fn statistics_json(kind: &str, plan_json: &str, categories_json: &str) -> Result<String, String> {
    let kind: StatisticsKind = kind.parse()?;
    let plan: TrainingPlan = from_json("plan", plan_json)?;
    let categories: Vec<String> = from_json("categories", categories_json)?;

    let chart = TrainingStatisticsManager::new(&plan).calculate(kind, &categories);
    serde_json::to_string(&chart).map_err(|e| e.to_string())
}

fn recommend_json(current_json: &str, previous_json: &str) -> Result<String, String> {
    let current: Vec<Exercise> = from_json("current exercises", current_json)?;
    let previous: Vec<Exercise> = from_json("previous exercises", previous_json)?;

    let weights = recommendation::recommend_weights(&current, &previous);
    serde_json::to_string(&weights).map_err(|e| e.to_string())
}

fn recommend_day_json(plan_json: &str, week: usize, day: usize) -> Result<String, String> {
    let plan: TrainingPlan = from_json("plan", plan_json)?;
    let weights = recommendation::recommend_for_day(&plan, week, day);
    serde_json::to_string(&weights).map_err(|e| e.to_string())
}

/// Weekly statistics of a plan
///
/// `kind` is `sets`, `tonnage` or `rpe`; `categories_json` is a JSON array of
/// category names. Returns `{ "Squat": [..], .. }`.
#[wasm_bindgen]
pub fn statistics(kind: &str, plan_json: &str, categories_json: &str) -> Result<String, JsValue> {
    statistics_json(kind, plan_json, categories_json).map_err(|e| JsValue::from_str(&e))
}

/// Weekly set counts per category
#[wasm_bindgen]
pub fn set_progression(plan_json: &str, categories_json: &str) -> Result<String, JsValue> {
    statistics("sets", plan_json, categories_json)
}

/// Weight recommendations for `current`, matched against `previous`
#[wasm_bindgen]
pub fn recommend_weights(current_json: &str, previous_json: &str) -> Result<String, JsValue> {
    recommend_json(current_json, previous_json).map_err(|e| JsValue::from_str(&e))
}

/// Weight recommendations for one day of a plan
#[wasm_bindgen]
pub fn recommend_for_day(plan_json: &str, week: usize, day: usize) -> Result<String, JsValue> {
    recommend_day_json(plan_json, week, day).map_err(|e| JsValue::from_str(&e))
}

/// Parse a weight string such as "100", "225 lbs" or "82,5kg" to kilograms
#[wasm_bindgen]
pub fn weight_in_kg(raw: &str) -> Option<f64> {
    parse_weight_kg(raw)
}
