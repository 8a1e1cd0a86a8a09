//! Meal service - logging, editing and daily totals
//!
//! Every mutation waits for the store to confirm it, then re-reads the whole
//! day and recomputes totals from that set. A failed mutation returns its
//! error and no snapshot.

use crate::error::ApiError;
use crate::state::Stores;
use chrono::NaiveDate;
use macrotrack_shared::types::{
    DailySummaryResponse, DaySnapshot, LogMealRequest, MealsByTypeResponse, UpdateMealRequest,
};
use macrotrack_shared::{
    meals_of_type, total_calories_of_type, DailyLog, DailyProgress, GoalTargets, MealType,
    NewMealEntry,
};
use tracing::{debug, info};
use uuid::Uuid;

/// Meal service
pub struct MealService;

impl MealService {
    /// Current meals and totals for one day
    pub async fn day_snapshot(
        stores: &Stores,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<DaySnapshot, ApiError> {
        let meals = stores.meals.list_for_day(user_id, date).await?;
        let log = DailyLog::from_meals(user_id, date, meals);
        let totals = log.totals();

        debug!(
            %user_id,
            %date,
            meal_count = log.meals().len(),
            calories = totals.calories,
            "Daily totals recomputed"
        );

        Ok(DaySnapshot {
            date,
            subtotals: log.subtotals(),
            totals,
            meals: log.into_meals(),
        })
    }

    /// Log a meal from a catalog food or from manual values
    pub async fn log_meal(
        stores: &Stores,
        user_id: Uuid,
        req: LogMealRequest,
    ) -> Result<DaySnapshot, ApiError> {
        let meal_type = req.parsed_meal_type()?;
        let quantity_grams = req.quantity_or_default();

        let new_meal = match req.food_id {
            Some(food_id) => {
                let food = stores
                    .foods
                    .get(food_id)
                    .await?
                    .ok_or_else(|| ApiError::NotFound("Food not found".to_string()))?;
                NewMealEntry::from_food(user_id, &food, quantity_grams, meal_type, req.meal_date)?
            }
            None => NewMealEntry::manual(
                user_id,
                req.name.clone(),
                meal_type,
                req.meal_date,
                quantity_grams,
                req.manual_nutrients()?,
            )?,
        };

        let meal = stores.meals.insert(new_meal).await?;
        info!(
            %user_id,
            meal_id = %meal.id,
            date = %meal.meal_date,
            meal_type = %meal.meal_type,
            calories = meal.calories,
            "Meal logged"
        );

        Self::day_snapshot(stores, user_id, meal.meal_date).await
    }

    /// Edit a meal; the snapshot is for the date the meal ends up on
    pub async fn update_meal(
        stores: &Stores,
        user_id: Uuid,
        meal_id: Uuid,
        req: UpdateMealRequest,
    ) -> Result<DaySnapshot, ApiError> {
        let current = stores
            .meals
            .get(user_id, meal_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Meal not found".to_string()))?;

        let patch = req.to_patch(&current)?;
        let food = match (current.food_id, patch.quantity_grams) {
            (Some(food_id), Some(_)) => stores.foods.get(food_id).await?,
            _ => None,
        };
        let update = current.resolve_patch(&patch, food.as_ref())?;

        let meal = stores
            .meals
            .update(user_id, meal_id, update)
            .await?
            .ok_or_else(|| ApiError::NotFound("Meal not found".to_string()))?;

        info!(
            %user_id,
            %meal_id,
            from_date = %current.meal_date,
            date = %meal.meal_date,
            calories = meal.calories,
            "Meal updated"
        );

        Self::day_snapshot(stores, user_id, meal.meal_date).await
    }

    /// Delete a meal and return its day without it
    pub async fn delete_meal(
        stores: &Stores,
        user_id: Uuid,
        meal_id: Uuid,
    ) -> Result<DaySnapshot, ApiError> {
        let meal = stores
            .meals
            .get(user_id, meal_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Meal not found".to_string()))?;

        let removed = stores.meals.delete(user_id, meal_id).await?;
        info!(%user_id, %meal_id, date = %meal.meal_date, removed, "Meal deleted");

        Self::day_snapshot(stores, user_id, meal.meal_date).await
    }

    /// Day snapshot with progress against the user's targets
    ///
    /// Users who have not onboarded are measured against the fallback targets.
    pub async fn daily_summary(
        stores: &Stores,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<DailySummaryResponse, ApiError> {
        let profile = stores.profiles.get(user_id).await?;
        let snapshot = Self::day_snapshot(stores, user_id, date).await?;

        let (targets, onboarded) = match &profile {
            Some(p) => (GoalTargets::from(&p.goals), true),
            None => (GoalTargets::FALLBACK, false),
        };

        Ok(DailySummaryResponse {
            progress: DailyProgress::new(&snapshot.totals, &targets),
            targets,
            onboarded,
            snapshot,
        })
    }

    pub async fn meals_by_type(
        stores: &Stores,
        user_id: Uuid,
        date: NaiveDate,
        meal_type: MealType,
    ) -> Result<MealsByTypeResponse, ApiError> {
        let meals = stores.meals.list_for_day(user_id, date).await?;

        Ok(MealsByTypeResponse {
            date,
            meal_type,
            total_calories: total_calories_of_type(&meals, meal_type),
            meals: meals_of_type(&meals, meal_type).into_iter().cloned().collect(),
        })
    }
}
