//! HTTP surface
//!
//! Health probes live at the root; the API is nested under `/api/v1`.
//! The API root and `/api/v1/goals/preview` are public. Profile, meal and
//! food routes require a provider token.

use crate::config::ServerConfig;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod foods;
mod goals;
mod health;
mod meals;
mod profile;

/// Build the application router with its middleware stack
pub fn create_router(state: AppState) -> Router {
    let server = state.config().server.clone();

    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/api/v1/", get(api_root))
        .nest("/api/v1", api_routes());

    with_middleware(router, &server).with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_root))
        .nest("/goals", goals::goals_routes())
        .nest("/profile", profile::profile_routes())
        .nest("/meals", meals::meal_routes())
        .nest("/foods", foods::food_routes())
}

async fn api_root() -> &'static str {
    "MacroTrack API v1"
}

fn with_middleware(router: Router<AppState>, server: &ServerConfig) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    router
        .layer(RequestBodyLimitLayer::new(server.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
}
