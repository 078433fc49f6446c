//! Execution Handlers
//!
//! Simulated SQL execution against the synthetic rows.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, Extension, Json};

use crate::protocol::rest::dto::{ApiResponse, ExecuteSqlRequest};
use crate::protocol::rest::error::RestError;
use crate::protocol::Handler;
use crate::query::ExecuteResult;

/// Execute SQL, returning rows and a summary
pub async fn execute_sql(
    Extension(handler): Extension<Arc<Handler>>,
    payload: Result<Json<ExecuteSqlRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ExecuteResult>>, RestError> {
    let Json(request) = payload?;
    let sql = request.sql.as_deref().unwrap_or_default();
    let result = handler.execute_sql(sql)?;
    Ok(Json(ApiResponse::success(result)))
}
