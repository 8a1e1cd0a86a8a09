//! Meal aggregator
//!
//! Daily totals are always folded from the full current meal set. Nothing in
//! this module patches a previous total with a delta; after any confirmed
//! mutation the caller re-reads the day and recomputes.

use crate::models::{MealEntry, MealType, NutrientAmounts};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sums of absolute nutrient values over a set of meals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl DailyTotals {
    fn add(mut self, amounts: NutrientAmounts) -> Self {
        self.calories += amounts.calories;
        self.protein += amounts.protein;
        self.carbs += amounts.carbs;
        self.fats += amounts.fats;
        self
    }

    pub fn is_zero(&self) -> bool {
        *self == DailyTotals::default()
    }
}

/// Sum all meals; an empty set yields all-zero totals
pub fn compute_daily_totals<'a, I>(meals: I) -> DailyTotals
where
    I: IntoIterator<Item = &'a MealEntry>,
{
    meals
        .into_iter()
        .fold(DailyTotals::default(), |acc, meal| acc.add(meal.nutrients()))
}

/// Meals of one type, in input order
pub fn meals_of_type(meals: &[MealEntry], meal_type: MealType) -> Vec<&MealEntry> {
    meals.iter().filter(|m| m.meal_type == meal_type).collect()
}

/// Calories logged under one meal type
pub fn total_calories_of_type(meals: &[MealEntry], meal_type: MealType) -> f64 {
    meals_of_type(meals, meal_type)
        .into_iter()
        .map(|m| m.calories)
        .sum()
}

/// Totals per meal type; every type is present even when empty
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MealTypeSubtotals {
    pub breakfast: DailyTotals,
    pub lunch: DailyTotals,
    pub dinner: DailyTotals,
    pub snack: DailyTotals,
}

impl MealTypeSubtotals {
    pub fn get(&self, meal_type: MealType) -> &DailyTotals {
        match meal_type {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Dinner => &self.dinner,
            MealType::Snack => &self.snack,
        }
    }

    fn get_mut(&mut self, meal_type: MealType) -> &mut DailyTotals {
        match meal_type {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
            MealType::Snack => &mut self.snack,
        }
    }
}

pub fn subtotals_by_type(meals: &[MealEntry]) -> MealTypeSubtotals {
    meals
        .iter()
        .fold(MealTypeSubtotals::default(), |mut acc, meal| {
            let slot = acc.get_mut(meal.meal_type);
            *slot = slot.add(meal.nutrients());
            acc
        })
}

// ============================================================================
// Daily Log
// ============================================================================

/// Meals of one user on one date, with totals kept in step
///
/// Callers own fetching the meal set and hand it in; the log never reaches
/// for data on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyLog {
    user_id: Uuid,
    date: NaiveDate,
    meals: Vec<MealEntry>,
    totals: DailyTotals,
}

impl DailyLog {
    /// Build a log, keeping only meals for `(user_id, date)`
    pub fn from_meals(user_id: Uuid, date: NaiveDate, meals: Vec<MealEntry>) -> Self {
        let mut log = Self {
            user_id,
            date,
            meals: Vec::new(),
            totals: DailyTotals::default(),
        };
        log.replace_meals(meals);
        log
    }

    /// Swap in a freshly read meal set and recompute
    pub fn replace_meals(&mut self, meals: Vec<MealEntry>) {
        let (user_id, date) = (self.user_id, self.date);
        self.meals = meals
            .into_iter()
            .filter(|m| m.belongs_to(user_id, date))
            .collect();
        self.recompute();
    }

    /// Drop a meal if present; returns whether anything was removed
    pub fn remove(&mut self, meal_id: Uuid) -> bool {
        let before = self.meals.len();
        self.meals.retain(|m| m.id != meal_id);
        let removed = self.meals.len() != before;
        self.recompute();
        removed
    }

    fn recompute(&mut self) {
        self.totals = compute_daily_totals(&self.meals);
    }

    pub fn meals(&self) -> &[MealEntry] {
        &self.meals
    }

    pub fn totals(&self) -> DailyTotals {
        self.totals
    }

    pub fn subtotals(&self) -> MealTypeSubtotals {
        subtotals_by_type(&self.meals)
    }

    pub fn into_meals(self) -> Vec<MealEntry> {
        self.meals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use rstest::rstest;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn meal(user_id: Uuid, meal_type: MealType, calories: f64) -> MealEntry {
        MealEntry {
            id: Uuid::new_v4(),
            user_id,
            food_id: None,
            name: None,
            meal_type,
            meal_date: day(),
            quantity_grams: 100.0,
            calories,
            protein: calories / 20.0,
            carbs: calories / 10.0,
            fats: calories / 40.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn scenario_meals(user_id: Uuid) -> Vec<MealEntry> {
        vec![
            meal(user_id, MealType::Breakfast, 300.0),
            meal(user_id, MealType::Lunch, 450.0),
            meal(user_id, MealType::Snack, 120.0),
        ]
    }

    #[test]
    fn test_empty_day_is_all_zero() {
        let totals = compute_daily_totals(&Vec::<MealEntry>::new());
        assert!(totals.is_zero());
        assert_eq!(totals.calories, 0.0);
    }

    #[test]
    fn test_scenario_totals_then_delete() {
        let user_id = Uuid::new_v4();
        let meals = scenario_meals(user_id);
        let lunch_id = meals[1].id;

        let mut log = DailyLog::from_meals(user_id, day(), meals);
        assert_eq!(log.totals().calories, 870.0);

        assert!(log.remove(lunch_id));
        assert_eq!(log.totals().calories, 420.0);
        assert_eq!(log.meals().len(), 2);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let user_id = Uuid::new_v4();
        let mut log = DailyLog::from_meals(user_id, day(), scenario_meals(user_id));
        let before = log.totals();

        assert!(!log.remove(Uuid::new_v4()));
        assert_eq!(log.totals(), before);
    }

    #[test]
    fn test_log_ignores_other_users_and_dates() {
        let user_id = Uuid::new_v4();
        let mut meals = scenario_meals(user_id);
        meals.push(meal(Uuid::new_v4(), MealType::Dinner, 999.0));
        let mut tomorrow = meal(user_id, MealType::Dinner, 500.0);
        tomorrow.meal_date = day().succ_opt().unwrap();
        meals.push(tomorrow);

        let log = DailyLog::from_meals(user_id, day(), meals);
        assert_eq!(log.meals().len(), 3);
        assert_eq!(log.totals().calories, 870.0);
    }

    #[test]
    fn test_replace_meals_recomputes_from_scratch() {
        let user_id = Uuid::new_v4();
        let mut log = DailyLog::from_meals(user_id, day(), scenario_meals(user_id));

        log.replace_meals(vec![meal(user_id, MealType::Dinner, 640.0)]);
        assert_eq!(log.totals().calories, 640.0);
        assert_eq!(log.subtotals().dinner.calories, 640.0);
        assert_eq!(log.subtotals().breakfast.calories, 0.0);
    }

    #[test]
    fn test_replace_meals_keeps_the_log_key() {
        let user_id = Uuid::new_v4();
        let mut log = DailyLog::from_meals(user_id, day(), scenario_meals(user_id));

        let mut moved = meal(user_id, MealType::Lunch, 450.0);
        moved.meal_date = day().pred_opt().unwrap();
        log.replace_meals(vec![
            meal(user_id, MealType::Breakfast, 300.0),
            moved,
            meal(Uuid::new_v4(), MealType::Dinner, 999.0),
        ]);

        assert_eq!(log.meals().len(), 1);
        assert_eq!(log.totals().calories, 300.0);
    }

    #[rstest]
    #[case(MealType::Breakfast, 300.0)]
    #[case(MealType::Lunch, 450.0)]
    #[case(MealType::Dinner, 0.0)]
    #[case(MealType::Snack, 120.0)]
    fn test_total_calories_of_type(#[case] meal_type: MealType, #[case] expected: f64) {
        let meals = scenario_meals(Uuid::new_v4());
        assert_eq!(total_calories_of_type(&meals, meal_type), expected);
        assert_eq!(subtotals_by_type(&meals).get(meal_type).calories, expected);
    }

    #[test]
    fn test_meals_of_type_keeps_order() {
        let user_id = Uuid::new_v4();
        let meals = vec![
            meal(user_id, MealType::Snack, 100.0),
            meal(user_id, MealType::Lunch, 200.0),
            meal(user_id, MealType::Snack, 50.0),
        ];
        let snacks = meals_of_type(&meals, MealType::Snack);
        assert_eq!(snacks.len(), 2);
        assert_eq!(snacks[0].calories, 100.0);
        assert_eq!(snacks[1].calories, 50.0);
        assert!(meals_of_type(&meals, MealType::Breakfast).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: totals do not depend on meal order
        #[test]
        fn prop_totals_order_independent(
            calories in prop::collection::vec(0u32..2000, 0..12),
            rotation in 0usize..12
        ) {
            let user_id = Uuid::new_v4();
            let meals: Vec<MealEntry> = calories
                .iter()
                .map(|&c| meal(user_id, MealType::Lunch, c as f64))
                .collect();
            let mut rotated = meals.clone();
            if !rotated.is_empty() {
                let k = rotation % rotated.len();
                rotated.rotate_left(k);
            }
            rotated.reverse();

            // Integer-valued inputs keep the sums exact in f64
            prop_assert_eq!(compute_daily_totals(&meals).calories, compute_daily_totals(&rotated).calories);
        }

        /// Property: subtotals add back up to the day total
        #[test]
        fn prop_subtotals_sum_to_total(
            entries in prop::collection::vec((0usize..4, 0u32..2000), 0..12)
        ) {
            let user_id = Uuid::new_v4();
            let meals: Vec<MealEntry> = entries
                .iter()
                .map(|&(t, c)| meal(user_id, MealType::ALL[t], c as f64))
                .collect();
            let subtotals = subtotals_by_type(&meals);
            let sum: f64 = MealType::ALL.iter().map(|t| subtotals.get(*t).calories).sum();
            prop_assert_eq!(sum, compute_daily_totals(&meals).calories);
        }

        /// Property: removing an absent id twice changes nothing
        #[test]
        fn prop_remove_is_idempotent(calories in prop::collection::vec(0u32..2000, 1..8), idx in 0usize..8) {
            let user_id = Uuid::new_v4();
            let meals: Vec<MealEntry> = calories
                .iter()
                .map(|&c| meal(user_id, MealType::Dinner, c as f64))
                .collect();
            let target = meals[idx % meals.len()].id;
            let mut log = DailyLog::from_meals(user_id, day(), meals);

            log.remove(target);
            let once = log.totals();
            prop_assert!(!log.remove(target));
            prop_assert_eq!(log.totals(), once);
        }
    }
}
