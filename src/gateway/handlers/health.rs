//! Health check handler

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{Json, extract::State, http::StatusCode};
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::ApiResponse;

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status
    #[schema(example = "ok")]
    pub status: String,
    /// Storage backend: "postgres", "memory", or "error"
    #[schema(example = "postgres")]
    pub storage: String,
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
}

/// Health check endpoint
///
/// Pings PostgreSQL when configured; the in-memory store is always healthy.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse),
        (status = 503, description = "Storage unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let (status_code, status, storage) = match &state.pg_db {
        Some(db) => match db.health_check().await {
            Ok(()) => (StatusCode::OK, "ok", "postgres"),
            Err(e) => {
                tracing::error!(error = %e, "database health check failed");
                (StatusCode::SERVICE_UNAVAILABLE, "degraded", "error")
            }
        },
        None => (StatusCode::OK, "ok", "memory"),
    };

    (
        status_code,
        Json(ApiResponse::success(HealthResponse {
            status: status.to_string(),
            storage: storage.to_string(),
            timestamp_ms,
        })),
    )
}
