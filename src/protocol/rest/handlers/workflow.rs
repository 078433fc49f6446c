//! Workflow Handlers
//!
//! Runs upload, schema lookup and NL2SQL in sequence for one request.

use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    Extension, Json,
};

use super::documents::{read_form, record_upload};
use crate::protocol::rest::dto::{ApiResponse, WorkflowDto, WorkflowRequest};
use crate::protocol::rest::error::RestError;
use crate::protocol::Handler;

fn present(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

/// Parse either body shape into the step inputs plus an uploaded file count
async fn read_workflow(request: Request) -> Result<(WorkflowRequest, usize), RestError> {
    if !is_multipart(request.headers()) {
        let Json(body) = Json::<WorkflowRequest>::from_request(request, &()).await?;
        return Ok((body, 0));
    }

    let multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| RestError::bad_request(e.body_text()))?;
    let form = read_form(multipart).await?;
    let body = match present(form.json_data.as_deref()) {
        Some(text) => serde_json::from_str(text)
            .map_err(|e| RestError::bad_request(format!("Invalid json_data: {e}")))?,
        None => WorkflowRequest::default(),
    };
    Ok((body, form.file_count))
}

/// Run each step whose input is present. A failing step is reported in
/// `errors` without stopping the next one.
pub async fn workflow(
    Extension(handler): Extension<Arc<Handler>>,
    request: Request,
) -> Result<Json<ApiResponse<WorkflowDto>>, RestError> {
    let (request, file_count) = read_workflow(request).await?;
    let query = present(request.query.as_deref());
    let question = present(request.nl2sql_query.as_deref());
    if file_count == 0 && query.is_none() && question.is_none() {
        return Err(RestError::bad_request(
            "Provide files[], query and/or nl2sql_query",
        ));
    }

    let document_id = request.document_id.as_deref();
    let mut errors = Vec::new();

    let step_upload = (file_count > 0).then(|| record_upload(&handler, file_count));
    let step_query = query.and_then(|q| {
        handler
            .describe_schema(q, document_id)
            .map_err(|e| errors.push(format!("query: {e}")))
            .ok()
    });
    let step_nl2sql = question.and_then(|q| {
        handler
            .generate_sql(q, request.schema_hint.as_deref(), document_id)
            .map_err(|e| errors.push(format!("nl2sql: {e}")))
            .ok()
    });

    Ok(Json(ApiResponse::success(WorkflowDto {
        step_upload,
        step_query,
        step_nl2sql,
        errors,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_multipart_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!is_multipart(&headers));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("multipart/form-data; boundary=x"),
        );
        assert!(is_multipart(&headers));
    }
}
