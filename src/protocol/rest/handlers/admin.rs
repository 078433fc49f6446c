//! Admin Handlers
//!
//! Health check, statistics and reload-check endpoints.

use std::sync::Arc;

use axum::{Extension, Json};

use crate::protocol::rest::dto::{
    ApiResponse, HealthDto, ReloadCheckDto, StatsDto, TableStatsDto,
};
use crate::protocol::rest::error::RestError;
use crate::protocol::Handler;

/// Health check endpoint
pub async fn health(
    Extension(handler): Extension<Arc<Handler>>,
) -> Result<Json<ApiResponse<HealthDto>>, RestError> {
    let health = HealthDto {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: handler.uptime_seconds(),
    };

    Ok(Json(ApiResponse::success(health)))
}

/// Server statistics endpoint
pub async fn stats(
    Extension(handler): Extension<Arc<Handler>>,
) -> Result<Json<ApiResponse<StatsDto>>, RestError> {
    let tables = handler
        .engine()
        .store()
        .row_counts()
        .into_iter()
        .map(|(name, rows)| TableStatsDto { name, rows })
        .collect();

    let stats = StatsDto {
        request_count: handler.total_requests(),
        error_count: handler.total_errors(),
        documents: handler.documents().len(),
        tables,
        uptime_secs: handler.uptime_seconds(),
    };

    Ok(Json(ApiResponse::success(stats)))
}

/// Server start time, so a client can detect restarts
pub async fn reload_check(
    Extension(handler): Extension<Arc<Handler>>,
) -> Result<Json<ApiResponse<ReloadCheckDto>>, RestError> {
    Ok(Json(ApiResponse::success(ReloadCheckDto {
        started: handler.started_unix(),
    })))
}
