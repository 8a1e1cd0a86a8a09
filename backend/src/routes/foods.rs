//! Food catalog routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::FoodService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use macrotrack_shared::types::{FoodSearchQuery, FoodSearchResponse};
use macrotrack_shared::{CatalogFoodRecord, Food};
use uuid::Uuid;

/// Create food routes
pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_food))
        .route("/search", get(search_foods))
        .route("/:id", get(get_food))
}

/// GET /api/v1/foods/search?q=&limit= - Search the catalog by name
async fn search_foods(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<FoodSearchQuery>,
) -> Result<Json<FoodSearchResponse>, ApiError> {
    let foods =
        FoodService::search(state.stores(), state.config(), query.q.as_deref(), query.limit)
            .await?;
    Ok(Json(FoodSearchResponse {
        count: foods.len(),
        foods,
    }))
}

/// GET /api/v1/foods/:id - Look up one catalog food
async fn get_food(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Food>, ApiError> {
    let food_id =
        Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid food ID".to_string()))?;
    let food = FoodService::get(state.stores(), food_id).await?;
    Ok(Json(food))
}

/// POST /api/v1/foods - Add a food; upstream field names are accepted
async fn create_food(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(record): Json<CatalogFoodRecord>,
) -> Result<(StatusCode, Json<Food>), ApiError> {
    let food = FoodService::ingest(state.stores(), record).await?;
    Ok((StatusCode::CREATED, Json(food)))
}
