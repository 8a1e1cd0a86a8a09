//! Business logic services
//!
//! Services validate input, sequence store calls and hand data to the
//! shared core for calculation and aggregation.

pub mod foods;
pub mod meals;
pub mod profile;

pub use foods::FoodService;
pub use meals::MealService;
pub use profile::ProfileService;
