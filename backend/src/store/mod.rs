//! Store boundary
//!
//! Services talk to persistence only through these ports. `PgStore` backs
//! them with Postgres; `MemoryStore` keeps everything in process for tests
//! and local runs.

use async_trait::async_trait;
use chrono::NaiveDate;
use macrotrack_shared::{Food, MealEntry, MealUpdate, NewFood, NewMealEntry, UpsertProfile, UserProfile};
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Failure reported by a store adapter
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One profile per user, overwritten on each submission
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> StoreResult<Option<UserProfile>>;

    async fn upsert(&self, profile: UpsertProfile) -> StoreResult<UserProfile>;
}

/// Read-mostly food catalog with per-100g values
#[async_trait]
pub trait FoodCatalog: Send + Sync {
    /// Case-insensitive substring match on name; an empty query matches all
    async fn search(&self, query: &str, limit: i64) -> StoreResult<Vec<Food>>;

    async fn get(&self, id: Uuid) -> StoreResult<Option<Food>>;

    async fn create(&self, food: NewFood) -> StoreResult<Food>;
}

/// Logged meals, always scoped to their owner
#[async_trait]
pub trait MealStore: Send + Sync {
    /// Meals of one day, oldest first
    async fn list_for_day(&self, user_id: Uuid, date: NaiveDate) -> StoreResult<Vec<MealEntry>>;

    async fn get(&self, user_id: Uuid, id: Uuid) -> StoreResult<Option<MealEntry>>;

    async fn insert(&self, meal: NewMealEntry) -> StoreResult<MealEntry>;

    /// `None` when no meal with this id belongs to the user
    async fn update(&self, user_id: Uuid, id: Uuid, update: MealUpdate) -> StoreResult<Option<MealEntry>>;

    /// `false` when no meal with this id belongs to the user
    async fn delete(&self, user_id: Uuid, id: Uuid) -> StoreResult<bool>;

    async fn ping(&self) -> StoreResult<()>;
}
