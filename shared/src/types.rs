//! API request and response types

use crate::aggregation::{DailyTotals, MealTypeSubtotals};
use crate::errors::{InputError, InputResult};
use crate::goals::{BiometricInput, GoalProfile};
use crate::models::{BiometricPatch, MealEntry, MealPatch, MealType, NutrientAmounts, UserProfile};
use crate::progress::{DailyProgress, GoalTargets};
use crate::validation::{parse_activity_level, parse_goal, parse_meal_type, parse_sex};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quantity assumed when a manual entry omits one
pub const DEFAULT_QUANTITY_GRAMS: f64 = 100.0;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Query carrying the day being viewed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

fn age_from_request(age_years: i64) -> InputResult<u32> {
    if age_years <= 0 {
        return Err(InputError::invalid("age_years", "Age must be greater than 0"));
    }
    u32::try_from(age_years).map_err(|_| InputError::invalid("age_years", "Age is out of range"))
}

// ============================================================================
// Profile Types
// ============================================================================

/// Biometrics as submitted by the client
///
/// Enumerations arrive as strings so unknown values surface as field errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiometricsRequest {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: i64,
    pub sex: String,
    pub activity_level: String,
    pub goal: String,
}

impl TryFrom<BiometricsRequest> for BiometricInput {
    type Error = InputError;

    fn try_from(req: BiometricsRequest) -> Result<Self, Self::Error> {
        Ok(BiometricInput {
            weight_kg: req.weight_kg,
            height_cm: req.height_cm,
            age_years: age_from_request(req.age_years)?,
            sex: parse_sex(&req.sex)?,
            activity_level: parse_activity_level(&req.activity_level)?,
            goal: parse_goal(&req.goal)?,
        })
    }
}

/// Onboarding submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub biometrics: BiometricsRequest,
}

/// Profile edit; omitted fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBiometricsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_years: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

impl TryFrom<UpdateBiometricsRequest> for BiometricPatch {
    type Error = InputError;

    fn try_from(req: UpdateBiometricsRequest) -> Result<Self, Self::Error> {
        Ok(BiometricPatch {
            weight_kg: req.weight_kg,
            height_cm: req.height_cm,
            age_years: req.age_years.map(age_from_request).transpose()?,
            sex: req.sex.as_deref().map(parse_sex).transpose()?,
            activity_level: req
                .activity_level
                .as_deref()
                .map(parse_activity_level)
                .transpose()?,
            goal: req.goal.as_deref().map(parse_goal).transpose()?,
        })
    }
}

/// Calculated targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProfileResponse {
    pub bmr: f64,
    pub tdee: f64,
    pub daily_calorie_goal: i32,
    pub daily_protein_goal: i32,
    pub daily_carbs_goal: i32,
    pub daily_fats_goal: i32,
    /// kcal of the rounded macro targets minus the calorie goal
    pub macro_energy_drift: f64,
}

impl From<&GoalProfile> for GoalProfileResponse {
    fn from(goals: &GoalProfile) -> Self {
        Self {
            bmr: goals.bmr,
            tdee: goals.tdee,
            daily_calorie_goal: goals.daily_calorie_goal,
            daily_protein_goal: goals.daily_protein_goal,
            daily_carbs_goal: goals.daily_carbs_goal,
            daily_fats_goal: goals.daily_fats_goal,
            macro_energy_drift: goals.macro_energy_drift(),
        }
    }
}

/// Stored profile with its targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: String,
    pub activity_level: String,
    pub goal: String,
    pub goals: GoalProfileResponse,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserProfile> for ProfileResponse {
    fn from(profile: &UserProfile) -> Self {
        let b = &profile.biometrics;
        Self {
            user_id: profile.user_id,
            email: profile.email.clone(),
            weight_kg: b.weight_kg,
            height_cm: b.height_cm,
            age_years: b.age_years,
            sex: b.sex.to_string(),
            activity_level: b.activity_level.to_string(),
            goal: b.goal.to_string(),
            goals: GoalProfileResponse::from(&profile.goals),
            updated_at: profile.updated_at,
        }
    }
}

// ============================================================================
// Meal Types
// ============================================================================

/// Log a meal from a catalog food (`food_id`) or from manual values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMealRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub meal_type: String,
    pub meal_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_grams: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<f64>,
}

impl LogMealRequest {
    pub fn parsed_meal_type(&self) -> InputResult<MealType> {
        parse_meal_type(&self.meal_type)
    }

    pub fn quantity_or_default(&self) -> f64 {
        self.quantity_grams.unwrap_or(DEFAULT_QUANTITY_GRAMS)
    }

    /// Absolute values of a manual entry; calories are required
    pub fn manual_nutrients(&self) -> InputResult<NutrientAmounts> {
        let calories = self
            .calories
            .ok_or_else(|| InputError::invalid("calories", "Calories are required without a food_id"))?;
        Ok(NutrientAmounts {
            calories,
            protein: self.protein.unwrap_or(0.0),
            carbs: self.carbs.unwrap_or(0.0),
            fats: self.fats.unwrap_or(0.0),
        })
    }
}

/// Meal edit; omitted fields keep their stored values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMealRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_grams: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<f64>,
}

impl UpdateMealRequest {
    /// Build a patch against the stored entry
    ///
    /// Any nutrient field present makes the nutrients explicit; missing ones
    /// are taken from `current`.
    pub fn to_patch(&self, current: &MealEntry) -> InputResult<MealPatch> {
        let any_nutrient = self.calories.is_some()
            || self.protein.is_some()
            || self.carbs.is_some()
            || self.fats.is_some();
        let nutrients = any_nutrient.then(|| NutrientAmounts {
            calories: self.calories.unwrap_or(current.calories),
            protein: self.protein.unwrap_or(current.protein),
            carbs: self.carbs.unwrap_or(current.carbs),
            fats: self.fats.unwrap_or(current.fats),
        });

        Ok(MealPatch {
            name: self.name.clone(),
            meal_type: self.meal_type.as_deref().map(parse_meal_type).transpose()?,
            meal_date: self.meal_date,
            quantity_grams: self.quantity_grams,
            nutrients,
        })
    }
}

/// Full state of one day after a read or a confirmed mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    pub meals: Vec<MealEntry>,
    pub totals: DailyTotals,
    pub subtotals: MealTypeSubtotals,
}

/// Day snapshot plus progress against targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummaryResponse {
    #[serde(flatten)]
    pub snapshot: DaySnapshot,
    pub targets: GoalTargets,
    pub progress: DailyProgress,
    /// False when `targets` are the fallback values
    pub onboarded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealsByTypeResponse {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub meals: Vec<MealEntry>,
    pub total_calories: f64,
}

// ============================================================================
// Food Types
// ============================================================================

/// Catalog search parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodSearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSearchResponse {
    pub foods: Vec<crate::models::Food>,
    pub count: usize,
}
