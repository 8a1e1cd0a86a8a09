//! MacroTrack WASM Module
//!
//! Browser bindings for the goal calculator and meal aggregator, so the
//! client shows the same numbers the server stores. Structured values cross
//! the boundary as JSON in the server's wire format.

use macrotrack_shared::types::{BiometricsRequest, GoalProfileResponse};
use macrotrack_shared::{
    BiometricInput, DailyProgress, DailyTotals, GoalTargets, MealEntry,
};
use std::str::FromStr;
use wasm_bindgen::prelude::*;

/// Mifflin-St Jeor BMR; `sex` is "male" or "female"
#[wasm_bindgen]
pub fn calculate_bmr(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    sex: &str,
) -> Result<f64, JsValue> {
    let sex = macrotrack_shared::Sex::from_str(sex).map_err(to_js)?;
    Ok(macrotrack_shared::calculate_bmr(weight_kg, height_cm, age_years, sex))
}

/// BMR scaled by the activity multiplier
#[wasm_bindgen]
pub fn calculate_tdee(bmr: f64, activity_level: &str) -> Result<f64, JsValue> {
    let level = macrotrack_shared::ActivityLevel::from_str(activity_level).map_err(to_js)?;
    Ok(macrotrack_shared::calculate_tdee(bmr, level))
}

#[wasm_bindgen]
pub fn calculate_daily_calorie_goal(tdee: f64, goal: &str) -> Result<i32, JsValue> {
    let goal = macrotrack_shared::Goal::from_str(goal).map_err(to_js)?;
    Ok(macrotrack_shared::calculate_daily_calorie_goal(tdee, goal))
}

/// Full goal profile from a biometrics JSON object
#[wasm_bindgen]
pub fn calculate_goal_profile(biometrics_json: &str) -> Result<String, JsValue> {
    goal_profile_json(biometrics_json).map_err(|e| JsValue::from_str(&e))
}

/// Totals of a JSON array of meal entries
#[wasm_bindgen]
pub fn compute_daily_totals(meals_json: &str) -> Result<String, JsValue> {
    daily_totals_json(meals_json).map_err(|e| JsValue::from_str(&e))
}

/// Progress of a totals object against a targets object
#[wasm_bindgen]
pub fn compute_daily_progress(totals_json: &str, targets_json: &str) -> Result<String, JsValue> {
    daily_progress_json(totals_json, targets_json).map_err(|e| JsValue::from_str(&e))
}

/// Absolute amount of a per-100g value at the given quantity
#[wasm_bindgen]
pub fn scale_per_100g(per_100g: f64, quantity_grams: f64) -> f64 {
    macrotrack_shared::scale_per_100g(per_100g, quantity_grams)
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn goal_profile_json(biometrics_json: &str) -> Result<String, String> {
    let request: BiometricsRequest =
        serde_json::from_str(biometrics_json).map_err(|e| e.to_string())?;
    let input = BiometricInput::try_from(request).map_err(|e| e.to_string())?;
    let profile = macrotrack_shared::calculate_goal_profile(&input).map_err(|e| e.to_string())?;
    serde_json::to_string(&GoalProfileResponse::from(&profile)).map_err(|e| e.to_string())
}

fn daily_totals_json(meals_json: &str) -> Result<String, String> {
    let meals: Vec<MealEntry> = serde_json::from_str(meals_json).map_err(|e| e.to_string())?;
    let totals = macrotrack_shared::compute_daily_totals(&meals);
    serde_json::to_string(&totals).map_err(|e| e.to_string())
}

fn daily_progress_json(totals_json: &str, targets_json: &str) -> Result<String, String> {
    let totals: DailyTotals = serde_json::from_str(totals_json).map_err(|e| e.to_string())?;
    let targets: GoalTargets = serde_json::from_str(targets_json).map_err(|e| e.to_string())?;
    serde_json::to_string(&DailyProgress::new(&totals, &targets)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_goal_profile_json() {
        let input = json!({
            "weight_kg": 70.0,
            "height_cm": 175.0,
            "age_years": 25,
            "sex": "male",
            "activity_level": "moderate",
            "goal": "lose_weight",
        });
        let out: Value = serde_json::from_str(&goal_profile_json(&input.to_string()).unwrap()).unwrap();
        assert_eq!(out["daily_calorie_goal"], 2205);
        assert_eq!(out["daily_protein_goal"], 193);
        assert_eq!(out["daily_fats_goal"], 74);
    }

    #[test]
    fn test_goal_profile_json_rejects_bad_input() {
        let input = json!({
            "weight_kg": 70.0,
            "height_cm": 175.0,
            "age_years": 0,
            "sex": "male",
            "activity_level": "moderate",
            "goal": "maintain",
        });
        assert!(goal_profile_json(&input.to_string()).is_err());
        assert!(goal_profile_json("not json").is_err());
    }

    #[test]
    fn test_daily_totals_json() {
        let meal = |calories: f64| {
            json!({
                "id": "7d1f0c2e-3b4a-4c5d-8e9f-0a1b2c3d4e5f",
                "user_id": "11111111-2222-3333-4444-555555555555",
                "food_id": null,
                "name": "Manual",
                "meal_type": "lunch",
                "meal_date": "2025-03-14",
                "quantity_grams": 100.0,
                "calories": calories,
                "protein": 10.0,
                "carbs": 0.0,
                "fats": 0.0,
                "created_at": "2025-03-14T12:00:00Z",
                "updated_at": "2025-03-14T12:00:00Z",
            })
        };
        let meals = json!([meal(300.0), meal(450.0), meal(120.0)]);

        let out: Value = serde_json::from_str(&daily_totals_json(&meals.to_string()).unwrap()).unwrap();
        assert_eq!(out["calories"], 870.0);
        assert_eq!(out["protein"], 30.0);
    }

    #[test]
    fn test_daily_progress_json() {
        let totals = json!({ "calories": 500.0, "protein": 0.0, "carbs": 0.0, "fats": 0.0 });
        let targets = json!({ "calories": 2000, "protein": 150, "carbs": 200, "fats": 65 });

        let out: Value = serde_json::from_str(
            &daily_progress_json(&totals.to_string(), &targets.to_string()).unwrap(),
        )
        .unwrap();
        assert_eq!(out["calories"]["ratio"], 0.25);
    }

    #[test]
    fn test_scale_per_100g() {
        assert_eq!(scale_per_100g(165.0, 150.0), 247.5);
    }
}
