//! Document Handlers
//!
//! Schema uploads and the document list. Uploaded bytes are discarded; only
//! the document entry is recorded.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path},
    Extension, Json,
};

use crate::protocol::rest::dto::{
    ApiResponse, DeleteDocumentDto, DocumentListDto, MessageDto, UploadDto,
};
use crate::protocol::rest::error::RestError;
use crate::protocol::Handler;

/// Multipart field names accepted as files
const FILE_FIELDS: [&str; 2] = ["files[]", "files"];

/// Multipart text field carrying a JSON request alongside the files
const JSON_FIELD: &str = "json_data";

/// What a multipart form carried: named files are counted, not kept
#[derive(Debug, Default)]
pub(super) struct UploadForm {
    pub file_count: usize,
    pub json_data: Option<String>,
}

pub(super) async fn read_form(mut multipart: Multipart) -> Result<UploadForm, RestError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RestError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if FILE_FIELDS.contains(&name.as_str()) {
            if field.file_name().is_some_and(|f| !f.is_empty()) {
                form.file_count += 1;
            }
        } else if name == JSON_FIELD {
            let text = field
                .text()
                .await
                .map_err(|e| RestError::bad_request(format!("Invalid {JSON_FIELD} field: {e}")))?;
            form.json_data = Some(text);
        }
    }
    Ok(form)
}

/// Record one document for `file_count` uploaded files
pub(super) fn record_upload(handler: &Handler, file_count: usize) -> UploadDto {
    let document = handler.documents().create(file_count);
    UploadDto {
        status: "processed".to_string(),
        document_id: document.id,
        file_count,
        message: format!("Successfully uploaded {file_count} file(s)"),
    }
}

/// Register an upload of one or more named files
pub async fn upload_schema(
    Extension(handler): Extension<Arc<Handler>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<UploadDto>>, RestError> {
    let form = read_form(multipart).await?;
    if form.file_count == 0 {
        return Err(RestError::bad_request("No files selected"));
    }
    Ok(Json(ApiResponse::success(record_upload(&handler, form.file_count))))
}

/// List documents
pub async fn list_documents(
    Extension(handler): Extension<Arc<Handler>>,
) -> Result<Json<ApiResponse<DocumentListDto>>, RestError> {
    Ok(Json(ApiResponse::success(DocumentListDto {
        documents: handler.documents().list(),
    })))
}

/// Delete a document. Unknown ids succeed with `deleted: false`.
pub async fn delete_document(
    Extension(handler): Extension<Arc<Handler>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteDocumentDto>>, RestError> {
    let deleted = handler.documents().delete(&id);
    Ok(Json(ApiResponse::success(DeleteDocumentDto { id, deleted })))
}

/// Nothing is indexed, so clearing always succeeds
pub async fn clear_vector_store() -> Result<Json<ApiResponse<MessageDto>>, RestError> {
    Ok(Json(ApiResponse::success(MessageDto {
        message: "Vector store cleared.".to_string(),
    })))
}
