//! Catalog ingestion
//!
//! Upstream catalog rows name their nutrient fields inconsistently. They are
//! normalized here, once, into [`NewFood`]; nothing past this boundary looks
//! at alternative field names.

use crate::errors::InputResult;
use crate::models::NewFood;
use serde::{Deserialize, Serialize};

/// Raw catalog row as delivered by an upstream source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFoodRecord {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(alias = "calories")]
    pub calories_per_100g: f64,
    #[serde(
        alias = "protein",
        alias = "proteins",
        alias = "proteins_per_100g"
    )]
    pub protein_per_100g: f64,
    #[serde(
        alias = "carbs",
        alias = "carbohydrates",
        alias = "carbohydrates_per_100g"
    )]
    pub carbs_per_100g: f64,
    #[serde(alias = "fats", alias = "fat", alias = "fat_per_100g")]
    pub fats_per_100g: f64,
    #[serde(default, alias = "fiber")]
    pub fiber_per_100g: f64,
    #[serde(default, alias = "sugar", alias = "sugars")]
    pub sugar_per_100g: f64,
}

impl CatalogFoodRecord {
    /// Validate and convert into the canonical schema
    pub fn into_food(self) -> InputResult<NewFood> {
        let food = NewFood {
            name: self.name.trim().to_string(),
            brand: self.brand.filter(|b| !b.trim().is_empty()),
            barcode: self.barcode.filter(|b| !b.trim().is_empty()),
            calories_per_100g: self.calories_per_100g,
            protein_per_100g: self.protein_per_100g,
            carbs_per_100g: self.carbs_per_100g,
            fats_per_100g: self.fats_per_100g,
            fiber_per_100g: self.fiber_per_100g,
            sugar_per_100g: self.sugar_per_100g,
        };
        food.validate()?;
        Ok(food)
    }
}
