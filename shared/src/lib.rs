//! MacroTrack Shared Library
//!
//! The pure nutrition core: goal calculation, meal aggregation, progress,
//! units and validation, plus the record shapes and API types used by the
//! backend and WASM modules. Nothing here performs I/O.

pub mod aggregation;
pub mod catalog;
pub mod errors;
pub mod goals;
pub mod models;
pub mod progress;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use aggregation::*;
pub use errors::*;
pub use goals::*;
pub use progress::*;
pub use units::*;

pub use catalog::CatalogFoodRecord;
pub use models::{
    BiometricPatch, Food, MealEntry, MealPatch, MealType, MealUpdate, NewFood, NewMealEntry,
    NutrientAmounts, UpsertProfile, UserProfile,
};
