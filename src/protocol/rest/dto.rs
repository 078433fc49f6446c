//! REST API Data Transfer Objects
//!
//! Defines request/response types for the REST API endpoints. Engine results
//! (`DescribeResult`, `Nl2SqlResult`, `ExecuteResult`, `AnalyticsResult`)
//! are serialized as-is inside `data`.

use serde::{Deserialize, Serialize};

use crate::nl2sql::Nl2SqlResult;
use crate::protocol::Document;
use crate::query::DescribeResult;

/// JSON response: { success, data?, error? }
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorDto>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiErrorDto {
                code: code.into(),
                message: message.into(),
            }),
        }
    }
}

/// Error details in API response
#[derive(Debug, Serialize)]
pub struct ApiErrorDto {
    pub code: String,
    pub message: String,
}

/// First non-blank candidate, so clients may use any of the accepted field names
fn first_text<'a>(candidates: &[&'a Option<String>]) -> &'a str {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .find(|s| !s.trim().is_empty())
        .unwrap_or("")
}

// Schema lookup DTOs
/// Schema lookup request: `query`, `sql` or `text`
#[derive(Debug, Default, Deserialize)]
pub struct QuerySchemaRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub sql: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
}

impl QuerySchemaRequest {
    pub fn text(&self) -> &str {
        first_text(&[&self.query, &self.sql, &self.text])
    }
}

// NL2SQL DTOs
/// NL2SQL request: `query`, `question` or `text`
#[derive(Debug, Default, Deserialize)]
pub struct Nl2SqlRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub schema_hint: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
}

impl Nl2SqlRequest {
    pub fn question(&self) -> &str {
        first_text(&[&self.query, &self.question, &self.text])
    }
}

// Execution DTOs
/// SQL execution request
#[derive(Debug, Default, Deserialize)]
pub struct ExecuteSqlRequest {
    #[serde(default)]
    pub sql: Option<String>,
}

// Analytics DTOs
/// Analytics query string, defaults `month` / `revenue`
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default = "default_period")]
    pub period: String,
    #[serde(default = "default_metric")]
    pub metric: String,
}

fn default_period() -> String {
    "month".to_string()
}

fn default_metric() -> String {
    "revenue".to_string()
}

// Document DTOs
/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadDto {
    pub status: String,
    pub document_id: String,
    pub file_count: usize,
    pub message: String,
}

/// Document list response
#[derive(Debug, Serialize)]
pub struct DocumentListDto {
    pub documents: Vec<Document>,
}

/// Document deletion response; `deleted` is false for unknown ids
#[derive(Debug, Serialize)]
pub struct DeleteDocumentDto {
    pub id: String,
    pub deleted: bool,
}

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub message: String,
}

// Workflow DTOs
/// Sequential workflow request; each present field runs one step. Sent as a
/// JSON body, or as the `json_data` field of a multipart form with `files[]`.
#[derive(Debug, Default, Deserialize)]
pub struct WorkflowRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub nl2sql_query: Option<String>,
    #[serde(default)]
    pub schema_hint: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
}

/// Per-step results; a skipped or failed step is `null`, failures are
/// listed in `errors`
#[derive(Debug, Serialize)]
pub struct WorkflowDto {
    pub step_upload: Option<UploadDto>,
    pub step_query: Option<DescribeResult>,
    pub step_nl2sql: Option<Nl2SqlResult>,
    pub errors: Vec<String>,
}

// Admin DTOs
/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Row count of one table
#[derive(Debug, Serialize)]
pub struct TableStatsDto {
    pub name: String,
    pub rows: usize,
}

/// Server statistics response
#[derive(Debug, Serialize)]
pub struct StatsDto {
    pub request_count: u64,
    pub error_count: u64,
    pub documents: usize,
    pub tables: Vec<TableStatsDto>,
    pub uptime_secs: u64,
}

/// Reload check response: server start as unix seconds
#[derive(Debug, Serialize)]
pub struct ReloadCheckDto {
    pub started: f64,
}
