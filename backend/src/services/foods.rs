//! Food service - catalog search, lookup and ingestion

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::state::Stores;
use macrotrack_shared::{CatalogFoodRecord, Food, NewFood};
use tracing::info;
use uuid::Uuid;

/// Food service
pub struct FoodService;

impl FoodService {
    /// Search by name; a missing or blank query lists foods up to the limit
    pub async fn search(
        stores: &Stores,
        config: &AppConfig,
        query: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Food>, ApiError> {
        let limit = config.effective_search_limit(limit);
        let query = query.unwrap_or("").trim();

        Ok(stores.foods.search(query, i64::from(limit)).await?)
    }

    pub async fn get(stores: &Stores, id: Uuid) -> Result<Food, ApiError> {
        stores
            .foods
            .get(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Food not found".to_string()))
    }

    pub async fn create(stores: &Stores, food: NewFood) -> Result<Food, ApiError> {
        food.validate()?;
        let created = stores.foods.create(food).await?;
        info!(food_id = %created.id, name = %created.name, "Catalog food created");
        Ok(created)
    }

    /// Normalize an upstream catalog row and store it
    pub async fn ingest(stores: &Stores, record: CatalogFoodRecord) -> Result<Food, ApiError> {
        let food = record.into_food()?;
        Self::create(stores, food).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_ingest_then_search() {
        let stores = Stores::memory(MemoryStore::new());
        let config = AppConfig::default();

        let record: CatalogFoodRecord = serde_json::from_value(json!({
            "name": "Greek yogurt",
            "calories": 59,
            "proteins": 10.0,
            "carbohydrates": 3.6,
            "fat": 0.4
        }))
        .unwrap();
        let food = FoodService::ingest(&stores, record).await.unwrap();
        assert_eq!(food.protein_per_100g, 10.0);

        let found = FoodService::search(&stores, &config, Some("yogurt"), None).await.unwrap();
        assert_eq!(found.len(), 1);
        let all = FoodService::search(&stores, &config, None, Some(5)).await.unwrap();
        assert_eq!(all.len(), 1);

        assert_eq!(FoodService::get(&stores, food.id).await.unwrap().name, "Greek yogurt");
        assert!(matches!(
            FoodService::get(&stores, Uuid::new_v4()).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_negative_values() {
        let stores = Stores::memory(MemoryStore::new());
        let food = NewFood {
            name: "Broken".to_string(),
            brand: None,
            barcode: None,
            calories_per_100g: -1.0,
            protein_per_100g: 0.0,
            carbs_per_100g: 0.0,
            fats_per_100g: 0.0,
            fiber_per_100g: 0.0,
            sugar_per_100g: 0.0,
        };
        let err = FoodService::create(&stores, food).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }
}
