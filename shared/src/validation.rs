//! Input validation functions
//!
//! Field validators return `Result<(), String>` so callers can attach the
//! field name and a display label. [`validate_biometrics`] is the gate the
//! goal calculator runs before any formula.

use crate::errors::{InputError, InputResult};
use crate::goals::{ActivityLevel, BiometricInput, Goal, Sex};
use crate::models::MealType;

/// Validate body weight (in kg)
pub fn validate_weight_kg(weight_kg: f64) -> Result<(), String> {
    validate_positive(weight_kg, "Weight")
}

/// Validate height (in cm)
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    validate_positive(height_cm, "Height")
}

/// Validate age (in whole years)
pub fn validate_age_years(age_years: u32) -> Result<(), String> {
    if age_years == 0 {
        return Err("Age must be greater than 0".to_string());
    }
    Ok(())
}

/// Validate a logged quantity (in grams)
pub fn validate_quantity_grams(quantity_grams: f64) -> Result<(), String> {
    validate_positive(quantity_grams, "Quantity")
}

/// Validate a nutrient amount (kcal or grams)
pub fn validate_nutrient_amount(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Nutrient value must be a valid number".to_string());
    }
    if value < 0.0 {
        return Err("Nutrient value cannot be negative".to_string());
    }
    Ok(())
}

fn validate_positive(value: f64, label: &str) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err(format!("{} must be a valid number", label));
    }
    if value <= 0.0 {
        return Err(format!("{} must be greater than 0", label));
    }
    Ok(())
}

/// Reject biometrics the calculator cannot use
///
/// All numeric fields must be strictly positive and finite.
pub fn validate_biometrics(input: &BiometricInput) -> InputResult<()> {
    validate_weight_kg(input.weight_kg).map_err(|msg| InputError::invalid("weight_kg", msg))?;
    validate_height_cm(input.height_cm).map_err(|msg| InputError::invalid("height_cm", msg))?;
    validate_age_years(input.age_years).map_err(|msg| InputError::invalid("age_years", msg))?;
    Ok(())
}

// ============================================================================
// Enumerated Values
// ============================================================================

/// Valid biological sex values
pub const VALID_SEXES: &[&str] = &["male", "female"];

/// Valid activity levels
pub const VALID_ACTIVITY_LEVELS: &[&str] =
    &["sedentary", "light", "moderate", "active", "very_active"];

/// Valid goals
pub const VALID_GOALS: &[&str] = &["lose_weight", "maintain", "gain_muscle"];

/// Valid meal types
pub const VALID_MEAL_TYPES: &[&str] = &["breakfast", "lunch", "dinner", "snack"];

pub fn parse_sex(value: &str) -> InputResult<Sex> {
    value.parse()
}

pub fn parse_activity_level(value: &str) -> InputResult<ActivityLevel> {
    value.parse()
}

pub fn parse_goal(value: &str) -> InputResult<Goal> {
    value.parse()
}

pub fn parse_meal_type(value: &str) -> InputResult<MealType> {
    value.parse()
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" | "weight_kg" => "Weight",
        "height" | "height_cm" => "Height",
        "age" | "age_years" => "Age",
        "sex" => "Sex",
        "activity_level" => "Activity Level",
        "goal" => "Goal",
        "meal_type" => "Meal Type",
        "meal_date" => "Meal Date",
        "quantity_grams" => "Quantity",
        "calories" | "calories_per_100g" => "Calories",
        "protein" | "protein_per_100g" => "Protein",
        "carbs" | "carbs_per_100g" => "Carbs",
        "fats" | "fats_per_100g" => "Fats",
        "fiber_per_100g" => "Fiber",
        "sugar_per_100g" => "Sugar",
        "food_id" => "Food",
        "name" => "Name",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

impl From<&InputError> for ValidationError {
    fn from(err: &InputError) -> Self {
        let message = match err {
            InputError::InvalidInput { message, .. } => message.clone(),
            InputError::UnknownVariant { value, expected, .. } => {
                format!("'{}' is not one of: {}", value, expected)
            }
        };
        ValidationError::new(err.field(), &message)
    }
}
