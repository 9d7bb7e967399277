//! Application-wide error types.

use thiserror::Error;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The production dataset cannot be opened or reached.
    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    /// A dashboard query failed while executing.
    #[error("Query execution failed: {0}")]
    QueryExecution(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::DataSourceUnavailable(_) => 503,
            Self::QueryExecution(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::DataSourceUnavailable(_) => "DATA_SOURCE_UNAVAILABLE",
            Self::QueryExecution(_) => "QUERY_EXECUTION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
