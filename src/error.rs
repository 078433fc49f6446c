//! Engine error types.
//!
//! Every variant is an expected, caller-visible condition. The engine never
//! logs or swallows these; the protocol layer decides how to surface them.

use serde::{Deserialize, Serialize};

/// Errors returned by the simulation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum EngineError {
    /// Query, question or SQL text was empty after trimming
    #[error("Query is required")]
    EmptyQuery,

    /// Table name is not part of the fixed schema
    #[error("No schema found for table '{table}'")]
    SchemaNotFound { table: String },

    /// SQL text mentions no known table
    #[error("Could not resolve a table from SQL: {sql}")]
    UnresolvedTable { sql: String },

    /// Enumerated parameter had a value outside its domain
    #[error("Invalid {name} '{value}', expected one of: {expected}")]
    InvalidParameter {
        name: String,
        value: String,
        expected: String,
    },
}

impl EngineError {
    /// Stable machine-readable code, used in API error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::EmptyQuery => "EMPTY_QUERY",
            EngineError::SchemaNotFound { .. } => "SCHEMA_NOT_FOUND",
            EngineError::UnresolvedTable { .. } => "UNRESOLVED_TABLE",
            EngineError::InvalidParameter { .. } => "INVALID_PARAMETER",
        }
    }

    pub(crate) fn invalid_parameter(name: &str, value: &str, expected: &[&str]) -> Self {
        EngineError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Returns the trimmed text, or `EmptyQuery` when nothing is left.
pub(crate) fn require_text(text: &str) -> EngineResult<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(EngineError::EmptyQuery)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_whitespace() {
        assert_eq!(require_text("   \n\t"), Err(EngineError::EmptyQuery));
        assert_eq!(require_text("  orders "), Ok("orders"));
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let codes = [
            EngineError::EmptyQuery.code(),
            EngineError::SchemaNotFound {
                table: "x".to_string(),
            }
            .code(),
            EngineError::UnresolvedTable {
                sql: "x".to_string(),
            }
            .code(),
            EngineError::invalid_parameter("period", "year", &["day"]).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_invalid_parameter_message() {
        let err = EngineError::invalid_parameter("metric", "units", &["revenue", "orders"]);
        assert_eq!(
            err.to_string(),
            "Invalid metric 'units', expected one of: revenue, orders"
        );
    }
}
