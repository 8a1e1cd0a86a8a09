//! Data models for MacroTrack
//!
//! Canonical record shapes for profiles, catalog foods and logged meals.
//! Catalog foods carry per-100g values; meal entries carry absolute values
//! for the logged quantity.

use crate::errors::{InputError, InputResult};
use crate::goals::{ActivityLevel, BiometricInput, Goal, GoalProfile, Sex};
use crate::units::scale_per_100g;
use crate::validation::{validate_nutrient_amount, validate_quantity_grams, VALID_MEAL_TYPES};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Meal slot a logged food belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MealType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        MealType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| InputError::unknown_variant("meal_type", s, VALID_MEAL_TYPES))
    }
}

// ============================================================================
// Nutrients
// ============================================================================

/// Absolute energy and macro amounts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutrientAmounts {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl NutrientAmounts {
    /// All four amounts must be finite and non-negative
    pub fn validate(&self) -> InputResult<()> {
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fats", self.fats),
        ] {
            validate_nutrient_amount(value).map_err(|msg| InputError::invalid(field, msg))?;
        }
        Ok(())
    }
}

// ============================================================================
// Catalog Foods
// ============================================================================

/// Catalog food with nutrients per 100 g
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fats_per_100g: f64,
    pub fiber_per_100g: f64,
    pub sugar_per_100g: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Food {
    /// Absolute nutrients for `quantity_grams` of this food
    pub fn nutrients_for(&self, quantity_grams: f64) -> NutrientAmounts {
        NutrientAmounts {
            calories: scale_per_100g(self.calories_per_100g, quantity_grams),
            protein: scale_per_100g(self.protein_per_100g, quantity_grams),
            carbs: scale_per_100g(self.carbs_per_100g, quantity_grams),
            fats: scale_per_100g(self.fats_per_100g, quantity_grams),
        }
    }
}

/// Input for creating a catalog food
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFood {
    pub name: String,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fats_per_100g: f64,
    #[serde(default)]
    pub fiber_per_100g: f64,
    #[serde(default)]
    pub sugar_per_100g: f64,
}

impl NewFood {
    pub fn validate(&self) -> InputResult<()> {
        if self.name.trim().is_empty() {
            return Err(InputError::invalid("name", "Name cannot be empty"));
        }
        for (field, value) in [
            ("calories_per_100g", self.calories_per_100g),
            ("protein_per_100g", self.protein_per_100g),
            ("carbs_per_100g", self.carbs_per_100g),
            ("fats_per_100g", self.fats_per_100g),
            ("fiber_per_100g", self.fiber_per_100g),
            ("sugar_per_100g", self.sugar_per_100g),
        ] {
            validate_nutrient_amount(value).map_err(|msg| InputError::invalid(field, msg))?;
        }
        Ok(())
    }
}

// ============================================================================
// Meal Entries
// ============================================================================

/// Logged food, counted toward `meal_date`
///
/// Nutrient fields are absolute values for `quantity_grams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Option<Uuid>,
    pub name: Option<String>,
    pub meal_type: MealType,
    pub meal_date: NaiveDate,
    pub quantity_grams: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MealEntry {
    pub fn nutrients(&self) -> NutrientAmounts {
        NutrientAmounts {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
        }
    }

    /// Whether this entry counts toward the given user's day
    pub fn belongs_to(&self, user_id: Uuid, date: NaiveDate) -> bool {
        self.user_id == user_id && self.meal_date == date
    }

    /// Resolve a patch into the full set of values to store
    ///
    /// A quantity change on a catalog-backed entry is rescaled from the
    /// catalog's per-100g values (`food` must be the entry's food). A quantity
    /// change on a manual entry requires explicit nutrients.
    pub fn resolve_patch(&self, patch: &MealPatch, food: Option<&Food>) -> InputResult<MealUpdate> {
        let quantity_grams = match patch.quantity_grams {
            Some(q) => {
                validate_quantity_grams(q).map_err(|msg| InputError::invalid("quantity_grams", msg))?;
                q
            }
            None => self.quantity_grams,
        };
        let quantity_changed = quantity_grams != self.quantity_grams;

        let nutrients = match (patch.nutrients, food) {
            (Some(explicit), _) => {
                explicit.validate()?;
                explicit
            }
            (None, Some(food)) if quantity_changed => {
                let rescaled = food.nutrients_for(quantity_grams);
                rescaled.validate()?;
                rescaled
            }
            (None, None) if quantity_changed => {
                return Err(InputError::invalid(
                    "calories",
                    "Nutrients are required when changing the quantity of a manual entry",
                ));
            }
            (None, _) => self.nutrients(),
        };

        Ok(MealUpdate {
            name: patch.name.clone().or_else(|| self.name.clone()),
            meal_type: patch.meal_type.unwrap_or(self.meal_type),
            meal_date: patch.meal_date.unwrap_or(self.meal_date),
            quantity_grams,
            nutrients,
        })
    }
}

/// Input for logging a meal; nutrients are already absolute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMealEntry {
    pub user_id: Uuid,
    pub food_id: Option<Uuid>,
    pub name: Option<String>,
    pub meal_type: MealType,
    pub meal_date: NaiveDate,
    pub quantity_grams: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl NewMealEntry {
    /// Build an entry from a catalog food, scaling per-100g values once
    pub fn from_food(
        user_id: Uuid,
        food: &Food,
        quantity_grams: f64,
        meal_type: MealType,
        meal_date: NaiveDate,
    ) -> InputResult<Self> {
        validate_quantity_grams(quantity_grams)
            .map_err(|msg| InputError::invalid("quantity_grams", msg))?;
        let nutrients = food.nutrients_for(quantity_grams);
        nutrients.validate()?;

        Ok(Self::assemble(
            user_id,
            Some(food.id),
            Some(food.name.clone()),
            meal_type,
            meal_date,
            quantity_grams,
            nutrients,
        ))
    }

    /// Build an entry from manually entered absolute values
    pub fn manual(
        user_id: Uuid,
        name: Option<String>,
        meal_type: MealType,
        meal_date: NaiveDate,
        quantity_grams: f64,
        nutrients: NutrientAmounts,
    ) -> InputResult<Self> {
        validate_quantity_grams(quantity_grams)
            .map_err(|msg| InputError::invalid("quantity_grams", msg))?;
        nutrients.validate()?;

        Ok(Self::assemble(
            user_id,
            None,
            name,
            meal_type,
            meal_date,
            quantity_grams,
            nutrients,
        ))
    }

    fn assemble(
        user_id: Uuid,
        food_id: Option<Uuid>,
        name: Option<String>,
        meal_type: MealType,
        meal_date: NaiveDate,
        quantity_grams: f64,
        nutrients: NutrientAmounts,
    ) -> Self {
        Self {
            user_id,
            food_id,
            name,
            meal_type,
            meal_date,
            quantity_grams,
            calories: nutrients.calories,
            protein: nutrients.protein,
            carbs: nutrients.carbs,
            fats: nutrients.fats,
        }
    }
}

/// Requested changes to a logged meal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealPatch {
    pub name: Option<String>,
    pub meal_type: Option<MealType>,
    pub meal_date: Option<NaiveDate>,
    pub quantity_grams: Option<f64>,
    pub nutrients: Option<NutrientAmounts>,
}

/// Fully resolved values written by a meal update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealUpdate {
    pub name: Option<String>,
    pub meal_type: MealType,
    pub meal_date: NaiveDate,
    pub quantity_grams: f64,
    pub nutrients: NutrientAmounts,
}

// ============================================================================
// Profiles
// ============================================================================

/// Persisted profile: last submitted biometrics and the targets derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub biometrics: BiometricInput,
    pub goals: GoalProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for the profile upsert, keyed by user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertProfile {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub biometrics: BiometricInput,
    pub goals: GoalProfile,
}

/// Partial biometrics for a profile edit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiometricPatch {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age_years: Option<u32>,
    pub sex: Option<Sex>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
}

impl BiometricPatch {
    /// Overlay this patch on the stored biometrics
    pub fn apply_to(&self, current: &BiometricInput) -> BiometricInput {
        BiometricInput {
            weight_kg: self.weight_kg.unwrap_or(current.weight_kg),
            height_cm: self.height_cm.unwrap_or(current.height_cm),
            age_years: self.age_years.unwrap_or(current.age_years),
            sex: self.sex.unwrap_or(current.sex),
            activity_level: self.activity_level.unwrap_or(current.activity_level),
            goal: self.goal.unwrap_or(current.goal),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &BiometricPatch::default()
    }
}
