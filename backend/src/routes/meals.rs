//! Meal API routes
//!
//! Mutations respond with the recomputed day so clients never patch totals
//! themselves.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::MealService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use macrotrack_shared::types::{
    DailySummaryResponse, DateQuery, DaySnapshot, LogMealRequest, MealsByTypeResponse,
    UpdateMealRequest,
};
use macrotrack_shared::validation::parse_meal_type;
use uuid::Uuid;

/// Create meal routes
pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_day).post(log_meal))
        .route("/summary", get(get_summary))
        .route("/by-type/:meal_type", get(get_by_type))
        .route("/:id", patch(update_meal).delete(delete_meal))
}

/// GET /api/v1/meals?date= - Meals and totals for a day
async fn get_day(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateQuery>,
) -> Result<Json<DaySnapshot>, ApiError> {
    let snapshot = MealService::day_snapshot(state.stores(), auth.user_id, query.date).await?;
    Ok(Json(snapshot))
}

/// GET /api/v1/meals/summary?date= - Day snapshot with goal progress
async fn get_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailySummaryResponse>, ApiError> {
    let summary = MealService::daily_summary(state.stores(), auth.user_id, query.date).await?;
    Ok(Json(summary))
}

/// GET /api/v1/meals/by-type/:meal_type?date= - One meal slot of a day
async fn get_by_type(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(meal_type): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<Json<MealsByTypeResponse>, ApiError> {
    let meal_type = parse_meal_type(&meal_type)?;
    let meals =
        MealService::meals_by_type(state.stores(), auth.user_id, query.date, meal_type).await?;
    Ok(Json(meals))
}

/// POST /api/v1/meals - Log a meal
async fn log_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogMealRequest>,
) -> Result<(StatusCode, Json<DaySnapshot>), ApiError> {
    let snapshot = MealService::log_meal(state.stores(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// PATCH /api/v1/meals/:id - Edit a meal
async fn update_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateMealRequest>,
) -> Result<Json<DaySnapshot>, ApiError> {
    let meal_id = parse_meal_id(&id)?;
    let snapshot = MealService::update_meal(state.stores(), auth.user_id, meal_id, req).await?;
    Ok(Json(snapshot))
}

/// DELETE /api/v1/meals/:id - Delete a meal
async fn delete_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DaySnapshot>, ApiError> {
    let meal_id = parse_meal_id(&id)?;
    let snapshot = MealService::delete_meal(state.stores(), auth.user_id, meal_id).await?;
    Ok(Json(snapshot))
}

fn parse_meal_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest("Invalid meal ID".to_string()))
}
