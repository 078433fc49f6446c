//! Schema Handlers
//!
//! Free-text schema lookup.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, Extension, Json};

use crate::protocol::rest::dto::{ApiResponse, QuerySchemaRequest};
use crate::protocol::rest::error::RestError;
use crate::protocol::Handler;
use crate::query::DescribeResult;

/// Resolve a query to schema snippets
pub async fn query_schema(
    Extension(handler): Extension<Arc<Handler>>,
    payload: Result<Json<QuerySchemaRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DescribeResult>>, RestError> {
    let Json(request) = payload?;
    let result = handler.describe_schema(request.text(), request.document_id.as_deref())?;
    Ok(Json(ApiResponse::success(result)))
}
