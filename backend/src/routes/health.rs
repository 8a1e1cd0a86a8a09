//! Health endpoints
//!
//! `/health` and `/health/live` answer as long as the process serves
//! requests. `/health/ready` also round-trips the configured store and
//! answers 503 while it is unreachable.

use crate::config::StoreBackend;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Healthy,
    Alive,
    Ready,
    NotReady,
    Unhealthy,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: Status,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreCheck>,
}

/// Result of one store round-trip
#[derive(Serialize)]
pub struct StoreCheck {
    pub backend: StoreBackend,
    pub status: Status,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    fn bare(status: Status) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            store: None,
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::bare(Status::Healthy))
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::bare(Status::Alive))
}

pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let ping = state.stores().meals.ping().await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let (http_status, status, store_status, error) = match ping {
        Ok(()) => (StatusCode::OK, Status::Ready, Status::Healthy, None),
        Err(e) => {
            tracing::warn!(error = %e, "Store readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Status::NotReady,
                Status::Unhealthy,
                Some(e.to_string()),
            )
        }
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store: Some(StoreCheck {
            backend: state.config().store.backend,
            status: store_status,
            latency_ms,
            error,
        }),
    };

    (http_status, Json(response))
}
