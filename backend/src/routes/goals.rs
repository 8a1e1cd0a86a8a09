//! Goal preview route

use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{routing::post, Json, Router};
use macrotrack_shared::types::{BiometricsRequest, GoalProfileResponse};
use macrotrack_shared::BiometricInput;

pub fn goals_routes() -> Router<AppState> {
    Router::new().route("/preview", post(preview_goals))
}

/// POST /api/v1/goals/preview - Calculate targets without saving them
async fn preview_goals(
    Json(req): Json<BiometricsRequest>,
) -> Result<Json<GoalProfileResponse>, ApiError> {
    let input = BiometricInput::try_from(req)?;
    let goals = ProfileService::preview_goals(&input)?;
    Ok(Json(GoalProfileResponse::from(&goals)))
}
