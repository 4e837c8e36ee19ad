//! Error types for dataset construction, parsing and pipeline configuration.
//!
//! Column transformations themselves do not fail on missing columns, type
//! mismatches or malformed Julian codes; those are skipped or degraded.
//! The variants below cover the places where input genuinely cannot be
//! interpreted.

use polars::prelude::PolarsError;

use crate::models::DataType;

/// Result type for transformation operations
pub type TransformResult<T> = Result<T, TransformError>;

/// Error type for transformation operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Type mismatch in column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: String,
    },

    #[error("Null value in non-nullable column '{0}'")]
    NullViolation(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Compute error: {0}")]
    ComputeError(String),
}

impl From<PolarsError> for TransformError {
    fn from(err: PolarsError) -> Self {
        TransformError::ComputeError(err.to_string())
    }
}
