//! NL2SQL Handlers

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, Extension, Json};

use crate::nl2sql::Nl2SqlResult;
use crate::protocol::rest::dto::{ApiResponse, Nl2SqlRequest};
use crate::protocol::rest::error::RestError;
use crate::protocol::Handler;

/// Turn a natural-language question into SQL
pub async fn nl2sql(
    Extension(handler): Extension<Arc<Handler>>,
    payload: Result<Json<Nl2SqlRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Nl2SqlResult>>, RestError> {
    let Json(request) = payload?;
    let result = handler.generate_sql(
        request.question(),
        request.schema_hint.as_deref(),
        request.document_id.as_deref(),
    )?;
    Ok(Json(ApiResponse::success(result)))
}
