//! Dashboard query building, caching and rendering hand-off.
//!
//! This module provides:
//! - The predicate builder shared by every dashboard query
//! - The five fixed query shapes
//! - Result caching keyed by shape and predicate
//! - Snapshot types and the renderer seam
//! - Supersession of stale refreshes

pub mod cache;
pub mod error;
pub mod predicate;
pub mod query;
pub mod render;
pub mod session;
pub mod types;


pub use cache::{CacheKey, CacheStats, ResultCache};
pub use error::DashboardError;
pub use predicate::{Binding, InClause, Predicate};
pub use query::{DETAIL_ROW_CAP, QueryShape, RANKING_ROW_CAP};
pub use render::{
    Bar, Cell, DETAIL_COLUMNS, Renderer, SeriesPoint, Table, category_bars, detail_table,
    ranking_table, render_snapshot, year_series,
};
pub use session::{RefreshTicket, RefreshTracker};
pub use types::*;
