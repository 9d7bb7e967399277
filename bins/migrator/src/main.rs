//! Schema migration runner for Lavra.
//!
//! Usage:
//!   migrator up      - Create the production schema
//!   migrator down    - Drop the production schema
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The target dataset is read from `DATABASE_URL`, e.g.
//! `sqlite://data/lavra.db?mode=rwc`.

use lavra_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Run the migrator CLI (it sets up its own tracing)
    cli::run_cli(Migrator).await;
}
