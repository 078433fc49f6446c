//! Analytics Handlers

use std::sync::Arc;

use axum::{extract::Query, Extension, Json};

use crate::analytics::AnalyticsResult;
use crate::protocol::rest::dto::{AnalyticsQuery, ApiResponse};
use crate::protocol::rest::error::RestError;
use crate::protocol::Handler;

/// Dashboard KPIs and series, `?period=&metric=`
pub async fn analytics(
    Extension(handler): Extension<Arc<Handler>>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<AnalyticsResult>>, RestError> {
    let result = handler.analytics(&params.period, &params.metric)?;
    Ok(Json(ApiResponse::success(result)))
}
