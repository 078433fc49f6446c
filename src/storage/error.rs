//! Row Store Error Types

use thiserror::Error;

/// Failures while building the synthetic data set at startup.
///
/// Any of these means the generator is broken; the process should refuse to
/// serve a partially-initialized store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Generated row is missing a declared column
    #[error("Row {index} of '{table}' is missing column '{column}'")]
    MissingColumn {
        table: String,
        index: usize,
        column: String,
    },

    /// Generated value does not match the declared column type
    #[error("Row {index} of '{table}': column '{column}' expected {expected}, got {got}")]
    TypeMismatch {
        table: String,
        index: usize,
        column: String,
        expected: String,
        got: String,
    },

    /// Rows were generated for a table that is not in the catalog
    #[error("Rows generated for unknown table '{0}'")]
    UnknownTable(String),

    /// Generation window is unusable
    #[error("Invalid generation window: {0}")]
    InvalidWindow(String),
}

/// Result type for generation
pub type GenerationResult<T> = Result<T, GenerationError>;
