//! Dashboard data types.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DashboardError;
use super::query::QueryShape;
use crate::dimension::FilterSelection;

/// One production record as shown in the detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    /// Region code.
    pub region: String,
    /// Reference year.
    pub year: i32,
    /// Substance class name.
    pub class_name: String,
    /// Substance name.
    pub substance: String,
    /// Unit of the contained quantity.
    pub unit: String,
    /// Run-of-mine quantity.
    pub rom_quantity: Option<Decimal>,
    /// Contained quantity.
    pub contained_quantity: Option<Decimal>,
    /// Quantity sold.
    pub sale_quantity: Option<Decimal>,
    /// Sale value.
    pub sale_value: Option<Decimal>,
}

/// Aggregate for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTotal {
    /// Reference year.
    pub year: i32,
    /// Sum of the measure; `None` when every record in the group is null.
    pub total: Option<Decimal>,
}

/// Aggregate for one category (class, substance or region).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Category label.
    pub category: String,
    /// Sum of the measure; `None` when every record in the group is null.
    pub total: Option<Decimal>,
}

/// Shared, immutable rows as returned by the cache.
pub type Rows<T> = Arc<Vec<T>>;

/// Outcome of a single panel's query.
pub type PanelResult<T> = Result<Rows<T>, DashboardError>;

/// Everything the dashboard shows for one selection.
///
/// Panels fail independently: one failed query leaves the other four intact.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    /// Selection the snapshot was computed for.
    pub selection: FilterSelection,
    /// When the snapshot was assembled.
    pub generated_at: DateTime<Utc>,
    /// Detail table rows.
    pub detail: PanelResult<DetailRow>,
    /// ROM totals per year.
    pub rom_by_year: PanelResult<YearTotal>,
    /// Sale value per class.
    pub value_by_class: PanelResult<CategoryTotal>,
    /// Top substances by ROM.
    pub top_substances: PanelResult<CategoryTotal>,
    /// Top regions by sale value.
    pub top_regions: PanelResult<CategoryTotal>,
}

impl DashboardSnapshot {
    /// Panel failures, in rendering order.
    #[must_use]
    pub fn failures(&self) -> Vec<(QueryShape, &DashboardError)> {
        let results = [
            (QueryShape::DetailTable, self.detail.as_ref().err()),
            (QueryShape::RomByYear, self.rom_by_year.as_ref().err()),
            (QueryShape::ValueByClass, self.value_by_class.as_ref().err()),
            (
                QueryShape::TopSubstancesByRom,
                self.top_substances.as_ref().err(),
            ),
            (
                QueryShape::TopRegionsByValue,
                self.top_regions.as_ref().err(),
            ),
        ];
        results
            .into_iter()
            .filter_map(|(shape, error)| error.map(|e| (shape, e)))
            .collect()
    }

    /// The first failure that invalidates the whole snapshot, if any.
    #[must_use]
    pub fn fatal_error(&self) -> Option<&DashboardError> {
        self.failures()
            .into_iter()
            .map(|(_, error)| error)
            .find(|error| error.is_fatal())
    }
}
