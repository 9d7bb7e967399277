//! Cached dashboard service.
//!
//! Fronts [`ProductionRepository`] with one result cache per row type and
//! runs the five panel queries of a refresh concurrently.

use std::sync::Arc;

use chrono::Utc;
use lavra_core::dashboard::{
    CacheStats, CategoryTotal, DashboardError, DashboardSnapshot, DetailRow, PanelResult,
    Predicate, QueryShape, ResultCache, Rows, YearTotal,
};
use lavra_core::dimension::FilterSelection;
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::classify_error;
use crate::repositories::ProductionRepository;

/// Dashboard service shared by every viewer of the process.
#[derive(Clone)]
pub struct DashboardService {
    repo: ProductionRepository,
    details: ResultCache<Rows<DetailRow>>,
    yearly: ResultCache<Rows<YearTotal>>,
    categories: ResultCache<Rows<CategoryTotal>>,
}

impl DashboardService {
    /// Creates a service with unbounded caches.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_cache_capacity(db, None)
    }

    /// Creates a service whose caches each hold at most `max_capacity` entries.
    #[must_use]
    pub fn with_cache_capacity(db: DatabaseConnection, max_capacity: Option<u64>) -> Self {
        Self {
            repo: ProductionRepository::new(db),
            details: ResultCache::with_capacity(max_capacity),
            yearly: ResultCache::with_capacity(max_capacity),
            categories: ResultCache::with_capacity(max_capacity),
        }
    }

    /// Detail table rows for `predicate`.
    ///
    /// # Errors
    ///
    /// Returns the classified driver error if the query fails.
    pub async fn detail(&self, predicate: &Predicate) -> PanelResult<DetailRow> {
        let repo = &self.repo;
        self.details
            .get_or_compute(QueryShape::DetailTable, predicate, || async move {
                repo.query_detail(predicate).await.map(Arc::new)
            })
            .await
            .map_err(|e| classify_error(QueryShape::DetailTable, &e))
    }

    /// ROM totals per year for `predicate`.
    ///
    /// # Errors
    ///
    /// Returns the classified driver error if the query fails.
    pub async fn rom_by_year(&self, predicate: &Predicate) -> PanelResult<YearTotal> {
        let repo = &self.repo;
        self.yearly
            .get_or_compute(QueryShape::RomByYear, predicate, || async move {
                repo.query_rom_by_year(predicate).await.map(Arc::new)
            })
            .await
            .map_err(|e| classify_error(QueryShape::RomByYear, &e))
    }

    /// Sale value per class for `predicate`.
    ///
    /// # Errors
    ///
    /// Returns the classified driver error if the query fails.
    pub async fn value_by_class(&self, predicate: &Predicate) -> PanelResult<CategoryTotal> {
        let repo = &self.repo;
        self.categories
            .get_or_compute(QueryShape::ValueByClass, predicate, || async move {
                repo.query_value_by_class(predicate).await.map(Arc::new)
            })
            .await
            .map_err(|e| classify_error(QueryShape::ValueByClass, &e))
    }

    /// Top substances by ROM for `predicate`.
    ///
    /// # Errors
    ///
    /// Returns the classified driver error if the query fails.
    pub async fn top_substances_by_rom(&self, predicate: &Predicate) -> PanelResult<CategoryTotal> {
        let repo = &self.repo;
        self.categories
            .get_or_compute(QueryShape::TopSubstancesByRom, predicate, || async move {
                repo.query_top_substances_by_rom(predicate)
                    .await
                    .map(Arc::new)
            })
            .await
            .map_err(|e| classify_error(QueryShape::TopSubstancesByRom, &e))
    }

    /// Top regions by sale value for `predicate`.
    ///
    /// # Errors
    ///
    /// Returns the classified driver error if the query fails.
    pub async fn top_regions_by_value(&self, predicate: &Predicate) -> PanelResult<CategoryTotal> {
        let repo = &self.repo;
        self.categories
            .get_or_compute(QueryShape::TopRegionsByValue, predicate, || async move {
                repo.query_top_regions_by_value(predicate)
                    .await
                    .map(Arc::new)
            })
            .await
            .map_err(|e| classify_error(QueryShape::TopRegionsByValue, &e))
    }

    /// Runs one render cycle for `selection`.
    ///
    /// The predicate is built once and shared by all five queries, which run
    /// concurrently. A failed query only fails its own panel.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::DataSourceUnavailable`] if the dataset could
    /// not be reached by any of the queries; no partial snapshot is returned.
    pub async fn refresh(
        &self,
        selection: &FilterSelection,
    ) -> Result<DashboardSnapshot, DashboardError> {
        let predicate = Predicate::build(selection);

        let (detail, rom_by_year, value_by_class, top_substances, top_regions) = tokio::join!(
            self.detail(&predicate),
            self.rom_by_year(&predicate),
            self.value_by_class(&predicate),
            self.top_substances_by_rom(&predicate),
            self.top_regions_by_value(&predicate),
        );

        let snapshot = DashboardSnapshot {
            selection: selection.clone(),
            generated_at: Utc::now(),
            detail,
            rom_by_year,
            value_by_class,
            top_substances,
            top_regions,
        };

        if let Some(err) = snapshot.fatal_error() {
            error!(error = %err, predicate = %predicate, "dashboard refresh aborted");
            return Err(err.clone());
        }

        for (shape, err) in snapshot.failures() {
            warn!(shape = %shape, error = %err, "panel query failed");
        }

        info!(predicate = %predicate, "dashboard refreshed");
        Ok(snapshot)
    }

    /// Combined hit and miss counters of every cache.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        [
            self.details.stats(),
            self.yearly.stats(),
            self.categories.stats(),
        ]
        .into_iter()
        .fold(CacheStats::default(), |acc, s| CacheStats {
            hits: acc.hits + s.hits,
            misses: acc.misses + s.misses,
        })
    }
}
