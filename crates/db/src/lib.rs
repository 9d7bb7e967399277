//! Database layer with `SeaORM` statements and repositories.
//!
//! This crate provides:
//! - Connection setup for the production dataset
//! - The dataset schema as a migration
//! - Repositories for dimension options and the five dashboard queries
//! - `DashboardService`, which fronts the repositories with result caches

pub mod dashboard;
pub mod migration;
pub mod repositories;

pub use dashboard::DashboardService;
pub use repositories::{DimensionRepository, ProductionRepository};

use std::time::Duration;

use lavra_core::dashboard::{DashboardError, QueryShape};
use lavra_shared::config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection using the application's database settings.
///
/// Statements are logged by the driver through `tracing`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be opened.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .sqlx_logging(true);

    Database::connect(options).await
}

/// Classifies a driver error for the rendering boundary.
///
/// Connection and pool failures mean the dataset is unreachable; everything
/// else is a failure of the one query that ran.
#[must_use]
pub fn classify_error(shape: QueryShape, err: &DbErr) -> DashboardError {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            DashboardError::DataSourceUnavailable(err.to_string())
        }
        _ => DashboardError::QueryExecution {
            shape,
            message: err.to_string(),
        },
    }
}
