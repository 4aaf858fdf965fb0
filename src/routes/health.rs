use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{response::ApiResponse, state::AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub database: String,
}

/// Liveness plus a store round-trip. A dead store answers 503.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and store reachable", body = ApiResponse<HealthData>),
        (status = 503, description = "Store unreachable", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthData>>) {
    let (status, database) = match state.orm.ping().await {
        Ok(()) => (StatusCode::OK, "up"),
        Err(err) => {
            tracing::warn!(error = %err, "health check could not reach the database");
            (StatusCode::SERVICE_UNAVAILABLE, "down")
        }
    };

    let data = HealthData {
        status: if status.is_success() { "ok" } else { "degraded" }.to_string(),
        database: database.to_string(),
    };

    (status, Json(ApiResponse::success("Health check", data, None)))
}
