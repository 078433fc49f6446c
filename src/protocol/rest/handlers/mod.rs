//! REST API Handlers
//!
//! Contains all HTTP endpoint handlers organized by domain.

pub mod admin;
pub mod analytics;
pub mod documents;
pub mod execute;
pub mod nl2sql;
pub mod schema;
pub mod workflow;

use axum::http::Uri;

use crate::protocol::rest::error::RestError;

/// Fallback for unmatched routes, so every error shares the JSON envelope
pub async fn not_found(uri: Uri) -> RestError {
    RestError::not_found(format!("No route for {}", uri.path()))
}
