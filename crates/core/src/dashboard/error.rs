//! Dashboard error types.

use lavra_shared::AppError;
use thiserror::Error;

use super::query::QueryShape;

/// Failures surfaced to the rendering boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// The dataset could not be opened or reached. Fatal for the whole
    /// render cycle.
    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    /// A single query failed. Other panels of the same cycle still render.
    #[error("Query '{shape}' failed: {message}")]
    QueryExecution {
        /// The query that failed.
        shape: QueryShape,
        /// Driver error message.
        message: String,
    },

    /// A newer selection arrived before this refresh finished.
    ///
    /// Raised by [`RefreshTicket::ensure_current`](super::RefreshTicket::ensure_current)
    /// after the queries ran, never by the queries themselves, so it does not
    /// appear in a snapshot. The live socket drops the stale frame on it.
    #[error("Refresh superseded by a newer selection")]
    Superseded,
}

impl DashboardError {
    /// Returns true if this failure must abort the whole render cycle.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DataSourceUnavailable(_))
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::DataSourceUnavailable(message) => Self::DataSourceUnavailable(message),
            DashboardError::QueryExecution { shape, message } => {
                Self::QueryExecution(format!("{shape}: {message}"))
            }
            DashboardError::Superseded => Self::Internal(DashboardError::Superseded.to_string()),
        }
    }
}
