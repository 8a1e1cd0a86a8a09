//! Profile API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, patch, put},
    Json, Router,
};
use macrotrack_shared::types::{OnboardingRequest, ProfileResponse, UpdateBiometricsRequest};
use macrotrack_shared::{BiometricInput, BiometricPatch};

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/onboarding", put(onboard))
        .route("/biometrics", patch(update_biometrics))
}

/// GET /api/v1/profile - Current profile and targets
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = ProfileService::get_profile(state.stores(), auth.user_id).await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// PUT /api/v1/profile/onboarding - Submit biometrics and store computed targets
async fn onboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<OnboardingRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let input = BiometricInput::try_from(req.biometrics)?;
    let email = req.email.or(auth.email);
    let profile = ProfileService::onboard(state.stores(), auth.user_id, email, input).await?;
    Ok(Json(ProfileResponse::from(&profile)))
}

/// PATCH /api/v1/profile/biometrics - Edit biometrics and recompute targets
async fn update_biometrics(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateBiometricsRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let patch = BiometricPatch::try_from(req)?;
    let profile = ProfileService::update_biometrics(state.stores(), auth.user_id, patch).await?;
    Ok(Json(ProfileResponse::from(&profile)))
}
