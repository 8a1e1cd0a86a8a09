//! Goal calculator
//!
//! Converts biometrics into daily calorie and macronutrient targets:
//! biometrics → BMR → TDEE → calorie goal → macro split.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: no I/O, no logging, no ambient state
//! 2. **Validate at the Boundary**: the formulas trust their inputs;
//!    [`calculate_goal_profile`] validates before running them
//! 3. **Fixed Tables**: multipliers and ratios live on the enums
//! 4. **Independent Rounding**: each macro is rounded on its own, so the
//!    recombined energy may drift a few kcal from the calorie goal

use crate::errors::{InputError, InputResult};
use crate::units::{round_to_int, Macronutrient};
use crate::validation::{
    validate_biometrics, VALID_ACTIVITY_LEVELS, VALID_GOALS, VALID_SEXES,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Input Types
// ============================================================================

/// Sex used to pick the BMR formula branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Constant term of the Mifflin-St Jeor equation
    pub fn bmr_offset(&self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Very hard exercise or physical job
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

/// What the user is trying to achieve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    Maintain,
    GainMuscle,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::LoseWeight, Goal::Maintain, Goal::GainMuscle];

    /// Scale applied to TDEE to get the calorie goal
    pub fn calorie_multiplier(&self) -> f64 {
        match self {
            Goal::LoseWeight => 0.85,
            Goal::Maintain => 1.0,
            Goal::GainMuscle => 1.15,
        }
    }

    /// Share of total calories assigned to each macro
    pub fn macro_ratios(&self) -> MacroRatios {
        match self {
            // High protein, moderate carbs, lower fat
            Goal::LoseWeight => MacroRatios {
                protein: 0.35,
                carbs: 0.35,
                fats: 0.30,
            },
            Goal::Maintain => MacroRatios {
                protein: 0.30,
                carbs: 0.40,
                fats: 0.30,
            },
            Goal::GainMuscle => MacroRatios {
                protein: 0.30,
                carbs: 0.45,
                fats: 0.25,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::Maintain => "maintain",
            Goal::GainMuscle => "gain_muscle",
        }
    }
}

macro_rules! impl_wire_enum {
    ($ty:ty, $field:literal, $valid:expr, [$($variant:expr),+ $(,)?]) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = InputError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == normalized)
                    .ok_or_else(|| InputError::unknown_variant($field, s, $valid))
            }
        }
    };
}

impl_wire_enum!(Sex, "sex", VALID_SEXES, [Sex::Male, Sex::Female]);
impl_wire_enum!(
    ActivityLevel,
    "activity_level",
    VALID_ACTIVITY_LEVELS,
    [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ]
);
impl_wire_enum!(
    Goal,
    "goal",
    VALID_GOALS,
    [Goal::LoseWeight, Goal::Maintain, Goal::GainMuscle]
);

/// Biometrics submitted during onboarding or a profile edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricInput {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

// ============================================================================
// Output Types
// ============================================================================

/// Fractions of total calories per macro
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroRatios {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MacroRatios {
    pub fn sum(&self) -> f64 {
        self.protein + self.carbs + self.fats
    }

    pub fn ratio_for(&self, macro_: Macronutrient) -> f64 {
        match macro_ {
            Macronutrient::Protein => self.protein,
            Macronutrient::Carbs => self.carbs,
            Macronutrient::Fats => self.fats,
        }
    }
}

/// Daily macro targets in whole grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroGoals {
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
}

/// Calculated targets persisted with the user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProfile {
    /// Basal metabolic rate, kcal/day
    pub bmr: f64,
    /// Total daily energy expenditure, kcal/day
    pub tdee: f64,
    pub daily_calorie_goal: i32,
    pub daily_protein_goal: i32,
    pub daily_carbs_goal: i32,
    pub daily_fats_goal: i32,
}

impl GoalProfile {
    pub fn macro_goals(&self) -> MacroGoals {
        MacroGoals {
            protein: self.daily_protein_goal,
            carbs: self.daily_carbs_goal,
            fats: self.daily_fats_goal,
        }
    }

    /// Energy of the rounded macro targets minus the calorie goal
    pub fn macro_energy_drift(&self) -> f64 {
        crate::units::kcal_from_macros(
            self.daily_protein_goal as f64,
            self.daily_carbs_goal as f64,
            self.daily_fats_goal as f64,
        ) - self.daily_calorie_goal as f64
    }
}

// ============================================================================
// Calculations
// ============================================================================

/// Calculate Basal Metabolic Rate using the Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
///
/// Inputs are not validated here; non-positive values give meaningless
/// results.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, sex: Sex) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64 + sex.bmr_offset()
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = BMR × Activity Multiplier
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Calorie target for a goal, rounded to whole kcal
pub fn calculate_daily_calorie_goal(tdee: f64, goal: Goal) -> i32 {
    round_to_int(tdee * goal.calorie_multiplier())
}

/// Split a calorie goal into whole-gram macro targets
///
/// grams = round(calories × ratio / kcal_per_gram), per macro
pub fn calculate_macro_goals(calorie_goal: i32, goal: Goal) -> MacroGoals {
    let ratios = goal.macro_ratios();
    let grams = |macro_: Macronutrient| {
        round_to_int(calorie_goal as f64 * ratios.ratio_for(macro_) / macro_.kcal_per_gram())
    };

    MacroGoals {
        protein: grams(Macronutrient::Protein),
        carbs: grams(Macronutrient::Carbs),
        fats: grams(Macronutrient::Fats),
    }
}

/// Validate biometrics and run the full pipeline
pub fn calculate_goal_profile(input: &BiometricInput) -> InputResult<GoalProfile> {
    validate_biometrics(input)?;

    let bmr = calculate_bmr(input.weight_kg, input.height_cm, input.age_years, input.sex);
    let tdee = calculate_tdee(bmr, input.activity_level);
    let daily_calorie_goal = calculate_daily_calorie_goal(tdee, input.goal);
    let macros = calculate_macro_goals(daily_calorie_goal, input.goal);

    Ok(GoalProfile {
        bmr,
        tdee,
        daily_calorie_goal,
        daily_protein_goal: macros.protein,
        daily_carbs_goal: macros.carbs,
        daily_fats_goal: macros.fats,
    })
}
