//! In-process store adapter
//!
//! Mirrors the Postgres adapter's contract: owner scoping, oldest-first
//! ordering, unique barcodes. It can be switched offline to exercise
//! upstream failures.

use super::{FoodCatalog, MealStore, ProfileStore, StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use macrotrack_shared::{
    Food, MealEntry, MealUpdate, NewFood, NewMealEntry, UpsertProfile, UserProfile,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, UserProfile>,
    foods: Vec<Food>,
    /// Insertion order doubles as creation order
    meals: Vec<MealEntry>,
}

/// Store kept entirely in memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `Unavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, user_id: Uuid) -> StoreResult<Option<UserProfile>> {
        self.check_online()?;
        Ok(self.tables.read().await.profiles.get(&user_id).cloned())
    }

    async fn upsert(&self, profile: UpsertProfile) -> StoreResult<UserProfile> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let stored = match tables.profiles.get(&profile.user_id) {
            Some(existing) => UserProfile {
                user_id: profile.user_id,
                email: profile.email.or_else(|| existing.email.clone()),
                biometrics: profile.biometrics,
                goals: profile.goals,
                created_at: existing.created_at,
                updated_at: now,
            },
            None => UserProfile {
                user_id: profile.user_id,
                email: profile.email,
                biometrics: profile.biometrics,
                goals: profile.goals,
                created_at: now,
                updated_at: now,
            },
        };

        tables.profiles.insert(stored.user_id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl FoodCatalog for MemoryStore {
    async fn search(&self, query: &str, limit: i64) -> StoreResult<Vec<Food>> {
        self.check_online()?;
        let needle = query.trim().to_lowercase();
        let limit = usize::try_from(limit).unwrap_or(0);

        let mut matches: Vec<Food> = self
            .tables
            .read()
            .await
            .foods
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by_cached_key(|f| f.name.to_lowercase());
        matches.truncate(limit);
        Ok(matches)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Food>> {
        self.check_online()?;
        Ok(self
            .tables
            .read()
            .await
            .foods
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    async fn create(&self, food: NewFood) -> StoreResult<Food> {
        self.check_online()?;
        let mut tables = self.tables.write().await;

        if let Some(barcode) = &food.barcode {
            if tables.foods.iter().any(|f| f.barcode.as_ref() == Some(barcode)) {
                return Err(StoreError::Conflict(format!("barcode {} already exists", barcode)));
            }
        }

        let now = Utc::now();
        let created = Food {
            id: Uuid::new_v4(),
            name: food.name,
            brand: food.brand,
            barcode: food.barcode,
            calories_per_100g: food.calories_per_100g,
            protein_per_100g: food.protein_per_100g,
            carbs_per_100g: food.carbs_per_100g,
            fats_per_100g: food.fats_per_100g,
            fiber_per_100g: food.fiber_per_100g,
            sugar_per_100g: food.sugar_per_100g,
            created_at: now,
            updated_at: now,
        };
        tables.foods.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl MealStore for MemoryStore {
    async fn list_for_day(&self, user_id: Uuid, date: NaiveDate) -> StoreResult<Vec<MealEntry>> {
        self.check_online()?;
        Ok(self
            .tables
            .read()
            .await
            .meals
            .iter()
            .filter(|m| m.belongs_to(user_id, date))
            .cloned()
            .collect())
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<MealEntry>> {
        self.check_online()?;
        Ok(self
            .tables
            .read()
            .await
            .meals
            .iter()
            .find(|m| m.id == id && m.user_id == user_id)
            .cloned())
    }

    async fn insert(&self, meal: NewMealEntry) -> StoreResult<MealEntry> {
        self.check_online()?;
        let now = Utc::now();
        let entry = MealEntry {
            id: Uuid::new_v4(),
            user_id: meal.user_id,
            food_id: meal.food_id,
            name: meal.name,
            meal_type: meal.meal_type,
            meal_date: meal.meal_date,
            quantity_grams: meal.quantity_grams,
            calories: meal.calories,
            protein: meal.protein,
            carbs: meal.carbs,
            fats: meal.fats,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.meals.push(entry.clone());
        Ok(entry)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, update: MealUpdate) -> StoreResult<Option<MealEntry>> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let Some(entry) = tables
            .meals
            .iter_mut()
            .find(|m| m.id == id && m.user_id == user_id)
        else {
            return Ok(None);
        };

        entry.name = update.name;
        entry.meal_type = update.meal_type;
        entry.meal_date = update.meal_date;
        entry.quantity_grams = update.quantity_grams;
        entry.calories = update.nutrients.calories;
        entry.protein = update.nutrients.protein;
        entry.carbs = update.nutrients.carbs;
        entry.fats = update.nutrients.fats;
        entry.updated_at = Utc::now();

        Ok(Some(entry.clone()))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let before = tables.meals.len();
        tables.meals.retain(|m| !(m.id == id && m.user_id == user_id));
        Ok(tables.meals.len() != before)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_online()
    }
}
