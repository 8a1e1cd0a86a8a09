//! Progress against daily targets
//!
//! progress = consumed / target, per nutrient. The calorie ring shows the
//! uncapped ratio; macro bars use the capped percentage.

use crate::aggregation::DailyTotals;
use crate::goals::GoalProfile;
use serde::{Deserialize, Serialize};

/// Integer daily targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalTargets {
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
}

impl GoalTargets {
    /// Display targets for users who have not onboarded yet
    pub const FALLBACK: GoalTargets = GoalTargets {
        calories: 2000,
        protein: 150,
        carbs: 200,
        fats: 65,
    };
}

impl From<&GoalProfile> for GoalTargets {
    fn from(profile: &GoalProfile) -> Self {
        Self {
            calories: profile.daily_calorie_goal,
            protein: profile.daily_protein_goal,
            carbs: profile.daily_carbs_goal,
            fats: profile.daily_fats_goal,
        }
    }
}

/// Fraction of the target consumed; zero when the target is not positive
pub fn progress_ratio(current: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    current / goal
}

/// Percentage of the target consumed, capped at 100
pub fn progress_percent_capped(current: f64, goal: f64) -> f64 {
    (progress_ratio(current, goal) * 100.0).min(100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientProgress {
    pub consumed: f64,
    pub goal: i32,
    /// Negative once the target is exceeded
    pub remaining: f64,
    pub ratio: f64,
}

impl NutrientProgress {
    pub fn new(consumed: f64, goal: i32) -> Self {
        Self {
            consumed,
            goal,
            remaining: goal as f64 - consumed,
            ratio: progress_ratio(consumed, goal as f64),
        }
    }

    pub fn percent_capped(&self) -> f64 {
        progress_percent_capped(self.consumed, self.goal as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub calories: NutrientProgress,
    pub protein: NutrientProgress,
    pub carbs: NutrientProgress,
    pub fats: NutrientProgress,
}

impl DailyProgress {
    pub fn new(totals: &DailyTotals, targets: &GoalTargets) -> Self {
        Self {
            calories: NutrientProgress::new(totals.calories, targets.calories),
            protein: NutrientProgress::new(totals.protein, targets.protein),
            carbs: NutrientProgress::new(totals.carbs, targets.carbs),
            fats: NutrientProgress::new(totals.fats, targets.fats),
        }
    }
}
