//! Lavra API Server
//!
//! Main entry point for the mineral production dashboard service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lavra_api::{AppState, create_router};
use lavra_db::{DimensionRepository, connect_with};
use lavra_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lavra=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Open the dataset; nothing can be shown without it
    let db = match connect_with(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, url = %config.database.url, "Data source unavailable");
            return Err(e).context("Failed to open the production dataset");
        }
    };
    info!("Connected to database");

    // Filter options are loaded once and shared read-only
    let options = DimensionRepository::new(db.clone())
        .load_options()
        .await
        .context("Failed to load filter options")?;
    info!(
        regions = options.regions.len(),
        years = options.years.len(),
        substances = options.substances.len(),
        "Filter options loaded"
    );

    // Create application state
    let state = AppState::new(db, options, config.cache.max_capacity);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
