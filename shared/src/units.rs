//! Nutrient units, scaling and rounding
//!
//! Catalog foods store nutrients per 100 g; logged meals store absolute
//! values for the logged quantity. Conversion happens once, at the point a
//! meal is built, and integer targets are always produced by [`round_to_int`].
//!
//! # Design Principles
//!
//! 1. **One rounding rule**: half away from zero (`f64::round`)
//! 2. **Conversion at Boundaries**: scale on input, never at read time
//! 3. **Type Safety**: energy density lives on the macro enum, not in literals

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference quantity for catalog nutrient values
pub const REFERENCE_GRAMS: f64 = 100.0;

/// Round to the nearest integer, halves away from zero
///
/// Used for every integer target (calorie goal, macro grams).
pub fn round_to_int(value: f64) -> i32 {
    value.round() as i32
}

/// Convert a per-100g catalog value into the absolute value for `quantity_grams`
///
/// absolute = per100g × quantity / 100
pub fn scale_per_100g(per_100g: f64, quantity_grams: f64) -> f64 {
    per_100g * quantity_grams / REFERENCE_GRAMS
}

// ============================================================================
// Macronutrients
// ============================================================================

/// Macronutrient with its Atwater energy density
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Macronutrient {
    Protein,
    Carbs,
    Fats,
}

impl Macronutrient {
    pub const ALL: [Macronutrient; 3] = [
        Macronutrient::Protein,
        Macronutrient::Carbs,
        Macronutrient::Fats,
    ];

    /// Energy per gram in kcal
    pub fn kcal_per_gram(&self) -> f64 {
        match self {
            Macronutrient::Protein => 4.0,
            Macronutrient::Carbs => 4.0,
            Macronutrient::Fats => 9.0,
        }
    }

    /// Grams of this macro that provide `kcal`
    pub fn grams_for_kcal(&self, kcal: f64) -> f64 {
        kcal / self.kcal_per_gram()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Macronutrient::Protein => "protein",
            Macronutrient::Carbs => "carbs",
            Macronutrient::Fats => "fats",
        }
    }
}

impl fmt::Display for Macronutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Macronutrient {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "protein" | "proteins" => Ok(Macronutrient::Protein),
            "carbs" | "carb" | "carbohydrates" => Ok(Macronutrient::Carbs),
            "fats" | "fat" => Ok(Macronutrient::Fats),
            _ => Err(format!("Unknown macronutrient: {}", s)),
        }
    }
}

/// Energy provided by the given macro grams
///
/// Used to report how far independently rounded macro targets drift from
/// the calorie goal they were derived from.
pub fn kcal_from_macros(protein_g: f64, carbs_g: f64, fats_g: f64) -> f64 {
    protein_g * Macronutrient::Protein.kcal_per_gram()
        + carbs_g * Macronutrient::Carbs.kcal_per_gram()
        + fats_g * Macronutrient::Fats.kcal_per_gram()
}
