//! Postgres store adapter
//!
//! Owns its connection pool and the migrations under `backend/migrations`.

use super::{FoodCatalog, MealStore, ProfileStore, StoreError, StoreResult};
use crate::config::DatabaseConfig;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use macrotrack_shared::{
    BiometricInput, Food, GoalProfile, MealEntry, MealUpdate, NewFood, NewMealEntry,
    UpsertProfile, UserProfile,
};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.message().to_string())
            }
            other => StoreError::Backend(other.into()),
        }
    }
}

/// Profile row as stored
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    email: Option<String>,
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    sex: String,
    activity_level: String,
    goal: String,
    bmr: f64,
    tdee: f64,
    daily_calorie_goal: i32,
    daily_protein_goal: i32,
    daily_carbs_goal: i32,
    daily_fats_goal: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let user_id = row.user_id;
        let corrupt = |e: macrotrack_shared::InputError| {
            StoreError::Backend(anyhow!("corrupt profile {}: {}", user_id, e))
        };
        let biometrics = BiometricInput {
            weight_kg: row.weight_kg,
            height_cm: row.height_cm,
            age_years: u32::try_from(row.age_years)
                .map_err(|_| StoreError::Backend(anyhow!("negative age for {}", user_id)))?,
            sex: row.sex.parse().map_err(corrupt)?,
            activity_level: row.activity_level.parse().map_err(corrupt)?,
            goal: row.goal.parse().map_err(corrupt)?,
        };

        Ok(UserProfile {
            user_id: row.user_id,
            email: row.email,
            biometrics,
            goals: GoalProfile {
                bmr: row.bmr,
                tdee: row.tdee,
                daily_calorie_goal: row.daily_calorie_goal,
                daily_protein_goal: row.daily_protein_goal,
                daily_carbs_goal: row.daily_carbs_goal,
                daily_fats_goal: row.daily_fats_goal,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct FoodRow {
    id: Uuid,
    name: String,
    brand: Option<String>,
    barcode: Option<String>,
    calories_per_100g: f64,
    protein_per_100g: f64,
    carbs_per_100g: f64,
    fats_per_100g: f64,
    fiber_per_100g: f64,
    sugar_per_100g: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FoodRow> for Food {
    fn from(row: FoodRow) -> Self {
        Food {
            id: row.id,
            name: row.name,
            brand: row.brand,
            barcode: row.barcode,
            calories_per_100g: row.calories_per_100g,
            protein_per_100g: row.protein_per_100g,
            carbs_per_100g: row.carbs_per_100g,
            fats_per_100g: row.fats_per_100g,
            fiber_per_100g: row.fiber_per_100g,
            sugar_per_100g: row.sugar_per_100g,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct MealRow {
    id: Uuid,
    user_id: Uuid,
    food_id: Option<Uuid>,
    name: Option<String>,
    meal_type: String,
    meal_date: NaiveDate,
    quantity_grams: f64,
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MealRow> for MealEntry {
    type Error = StoreError;

    fn try_from(row: MealRow) -> Result<Self, Self::Error> {
        let meal_type = row
            .meal_type
            .parse()
            .map_err(|e| StoreError::Backend(anyhow!("corrupt meal {}: {}", row.id, e)))?;

        Ok(MealEntry {
            id: row.id,
            user_id: row.user_id,
            food_id: row.food_id,
            name: row.name,
            meal_type,
            meal_date: row.meal_date,
            quantity_grams: row.quantity_grams,
            calories: row.calories,
            protein: row.protein,
            carbs: row.carbs,
            fats: row.fats,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Escape LIKE wildcards and wrap for a substring match
fn contains_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Store backed by a Postgres pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool sized and timed by `config`
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let options = PgConnectOptions::from_str(&config.url)?.application_name("macrotrack");
        let min_connections = config.min_connections.min(config.max_connections);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(IDLE_TIMEOUT)
            .max_lifetime(MAX_LIFETIME)
            .test_before_acquire(true)
            .connect_with(options)
            .await?;

        info!(
            max = config.max_connections,
            min = min_connections,
            "Postgres pool ready"
        );
        Ok(Self::new(pool))
    }

    /// Apply pending migrations
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Store migrations applied");
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get(&self, user_id: Uuid) -> StoreResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, email, weight_kg, height_cm, age_years, sex, activity_level, goal,
                   bmr, tdee, daily_calorie_goal, daily_protein_goal, daily_carbs_goal,
                   daily_fats_goal, created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn upsert(&self, profile: UpsertProfile) -> StoreResult<UserProfile> {
        let b = &profile.biometrics;
        let g = &profile.goals;
        let age_years = i32::try_from(b.age_years)
            .map_err(|_| StoreError::Backend(anyhow!("age out of range: {}", b.age_years)))?;

        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO user_profiles (
                user_id, email, weight_kg, height_cm, age_years, sex, activity_level, goal,
                bmr, tdee, daily_calorie_goal, daily_protein_goal, daily_carbs_goal, daily_fats_goal
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (user_id) DO UPDATE SET
                email = COALESCE(EXCLUDED.email, user_profiles.email),
                weight_kg = EXCLUDED.weight_kg,
                height_cm = EXCLUDED.height_cm,
                age_years = EXCLUDED.age_years,
                sex = EXCLUDED.sex,
                activity_level = EXCLUDED.activity_level,
                goal = EXCLUDED.goal,
                bmr = EXCLUDED.bmr,
                tdee = EXCLUDED.tdee,
                daily_calorie_goal = EXCLUDED.daily_calorie_goal,
                daily_protein_goal = EXCLUDED.daily_protein_goal,
                daily_carbs_goal = EXCLUDED.daily_carbs_goal,
                daily_fats_goal = EXCLUDED.daily_fats_goal,
                updated_at = NOW()
            RETURNING user_id, email, weight_kg, height_cm, age_years, sex, activity_level, goal,
                      bmr, tdee, daily_calorie_goal, daily_protein_goal, daily_carbs_goal,
                      daily_fats_goal, created_at, updated_at
            "#,
        )
        .bind(profile.user_id)
        .bind(&profile.email)
        .bind(b.weight_kg)
        .bind(b.height_cm)
        .bind(age_years)
        .bind(b.sex.as_str())
        .bind(b.activity_level.as_str())
        .bind(b.goal.as_str())
        .bind(g.bmr)
        .bind(g.tdee)
        .bind(g.daily_calorie_goal)
        .bind(g.daily_protein_goal)
        .bind(g.daily_carbs_goal)
        .bind(g.daily_fats_goal)
        .fetch_one(&self.pool)
        .await?;

        UserProfile::try_from(row)
    }
}

#[async_trait]
impl FoodCatalog for PgStore {
    async fn search(&self, query: &str, limit: i64) -> StoreResult<Vec<Food>> {
        let rows = sqlx::query_as::<_, FoodRow>(
            r#"
            SELECT id, name, brand, barcode, calories_per_100g, protein_per_100g,
                   carbs_per_100g, fats_per_100g, fiber_per_100g, sugar_per_100g,
                   created_at, updated_at
            FROM foods
            WHERE name ILIKE $1
            ORDER BY LOWER(name), name
            LIMIT $2
            "#,
        )
        .bind(contains_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Food::from).collect())
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<Food>> {
        let row = sqlx::query_as::<_, FoodRow>(
            r#"
            SELECT id, name, brand, barcode, calories_per_100g, protein_per_100g,
                   carbs_per_100g, fats_per_100g, fiber_per_100g, sugar_per_100g,
                   created_at, updated_at
            FROM foods
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Food::from))
    }

    async fn create(&self, food: NewFood) -> StoreResult<Food> {
        let row = sqlx::query_as::<_, FoodRow>(
            r#"
            INSERT INTO foods (
                name, brand, barcode, calories_per_100g, protein_per_100g,
                carbs_per_100g, fats_per_100g, fiber_per_100g, sugar_per_100g
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, name, brand, barcode, calories_per_100g, protein_per_100g,
                      carbs_per_100g, fats_per_100g, fiber_per_100g, sugar_per_100g,
                      created_at, updated_at
            "#,
        )
        .bind(&food.name)
        .bind(&food.brand)
        .bind(&food.barcode)
        .bind(food.calories_per_100g)
        .bind(food.protein_per_100g)
        .bind(food.carbs_per_100g)
        .bind(food.fats_per_100g)
        .bind(food.fiber_per_100g)
        .bind(food.sugar_per_100g)
        .fetch_one(&self.pool)
        .await?;

        Ok(Food::from(row))
    }
}

#[async_trait]
impl MealStore for PgStore {
    async fn list_for_day(&self, user_id: Uuid, date: NaiveDate) -> StoreResult<Vec<MealEntry>> {
        let rows = sqlx::query_as::<_, MealRow>(
            r#"
            SELECT id, user_id, food_id, name, meal_type, meal_date, quantity_grams,
                   calories, protein, carbs, fats, created_at, updated_at
            FROM meals
            WHERE user_id = $1 AND meal_date = $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MealEntry::try_from).collect()
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<MealEntry>> {
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            SELECT id, user_id, food_id, name, meal_type, meal_date, quantity_grams,
                   calories, protein, carbs, fats, created_at, updated_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MealEntry::try_from).transpose()
    }

    async fn insert(&self, meal: NewMealEntry) -> StoreResult<MealEntry> {
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            INSERT INTO meals (
                user_id, food_id, name, meal_type, meal_date, quantity_grams,
                calories, protein, carbs, fats
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, food_id, name, meal_type, meal_date, quantity_grams,
                      calories, protein, carbs, fats, created_at, updated_at
            "#,
        )
        .bind(meal.user_id)
        .bind(meal.food_id)
        .bind(&meal.name)
        .bind(meal.meal_type.as_str())
        .bind(meal.meal_date)
        .bind(meal.quantity_grams)
        .bind(meal.calories)
        .bind(meal.protein)
        .bind(meal.carbs)
        .bind(meal.fats)
        .fetch_one(&self.pool)
        .await?;

        MealEntry::try_from(row)
    }

    async fn update(&self, user_id: Uuid, id: Uuid, update: MealUpdate) -> StoreResult<Option<MealEntry>> {
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            UPDATE meals SET
                name = $3,
                meal_type = $4,
                meal_date = $5,
                quantity_grams = $6,
                calories = $7,
                protein = $8,
                carbs = $9,
                fats = $10,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, food_id, name, meal_type, meal_date, quantity_grams,
                      calories, protein, carbs, fats, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&update.name)
        .bind(update.meal_type.as_str())
        .bind(update.meal_date)
        .bind(update.quantity_grams)
        .bind(update.nutrients.calories)
        .bind(update.nutrients.protein)
        .bind(update.nutrients.carbs)
        .bind(update.nutrients.fats)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MealEntry::try_from).transpose()
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
