//! Hand-off from query results to the rendering collaborator.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::DashboardError;
use super::query::QueryShape;
use super::types::{CategoryTotal, DashboardSnapshot, DetailRow, YearTotal};

/// Column labels of the detail table.
pub const DETAIL_COLUMNS: [&str; 9] = [
    "region",
    "year",
    "class",
    "substance",
    "unit",
    "rom_quantity",
    "contained_quantity",
    "sale_quantity",
    "sale_value",
];

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Label.
    Text(String),
    /// Year.
    Integer(i32),
    /// Quantity or value; `None` renders as an empty cell.
    Measure(Option<Decimal>),
}

/// Tabular panel content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Column labels.
    pub columns: Vec<&'static str>,
    /// Rows, one cell per column.
    pub rows: Vec<Vec<Cell>>,
}

/// A point of a line chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    /// Horizontal position (year).
    pub x: i32,
    /// Value at `x`.
    pub y: Option<Decimal>,
}

/// A bar of a bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bar {
    /// Category label.
    pub category: String,
    /// Bar height.
    pub value: Option<Decimal>,
}

/// Presentation side of the dashboard.
///
/// Implementations decide how each panel is shown; the dashboard only decides
/// which panel gets which kind of visual.
pub trait Renderer {
    /// Shows a table.
    fn table(&mut self, shape: QueryShape, table: Table);

    /// Shows a line chart.
    fn line_chart(&mut self, shape: QueryShape, points: Vec<SeriesPoint>);

    /// Shows a bar chart.
    fn bar_chart(&mut self, shape: QueryShape, bars: Vec<Bar>);

    /// Shows a panel whose query failed.
    fn failure(&mut self, shape: QueryShape, error: &DashboardError);
}

/// Builds the detail table.
#[must_use]
pub fn detail_table(rows: &[DetailRow]) -> Table {
    Table {
        columns: DETAIL_COLUMNS.to_vec(),
        rows: rows
            .iter()
            .map(|row| {
                vec![
                    Cell::Text(row.region.clone()),
                    Cell::Integer(row.year),
                    Cell::Text(row.class_name.clone()),
                    Cell::Text(row.substance.clone()),
                    Cell::Text(row.unit.clone()),
                    Cell::Measure(row.rom_quantity),
                    Cell::Measure(row.contained_quantity),
                    Cell::Measure(row.sale_quantity),
                    Cell::Measure(row.sale_value),
                ]
            })
            .collect(),
    }
}

/// Builds a two-column ranking table.
#[must_use]
pub fn ranking_table(shape: QueryShape, rows: &[CategoryTotal]) -> Table {
    let columns = match shape {
        QueryShape::TopSubstancesByRom => vec!["substance", "rom_total"],
        QueryShape::TopRegionsByValue => vec!["region", "sale_value_total"],
        QueryShape::ValueByClass => vec!["class", "sale_value_total"],
        QueryShape::DetailTable | QueryShape::RomByYear => vec!["category", "total"],
    };

    Table {
        columns,
        rows: rows
            .iter()
            .map(|row| vec![Cell::Text(row.category.clone()), Cell::Measure(row.total)])
            .collect(),
    }
}

/// Builds a line series from yearly totals.
#[must_use]
pub fn year_series(rows: &[YearTotal]) -> Vec<SeriesPoint> {
    rows.iter()
        .map(|row| SeriesPoint {
            x: row.year,
            y: row.total,
        })
        .collect()
}

/// Builds bars from category totals.
#[must_use]
pub fn category_bars(rows: &[CategoryTotal]) -> Vec<Bar> {
    rows.iter()
        .map(|row| Bar {
            category: row.category.clone(),
            value: row.total,
        })
        .collect()
}

/// Hands every panel of `snapshot` to `renderer`, in [`QueryShape::ALL`] order.
pub fn render_snapshot<R: Renderer + ?Sized>(snapshot: &DashboardSnapshot, renderer: &mut R) {
    match &snapshot.detail {
        Ok(rows) => renderer.table(QueryShape::DetailTable, detail_table(rows)),
        Err(e) => renderer.failure(QueryShape::DetailTable, e),
    }

    match &snapshot.rom_by_year {
        Ok(rows) => renderer.line_chart(QueryShape::RomByYear, year_series(rows)),
        Err(e) => renderer.failure(QueryShape::RomByYear, e),
    }

    match &snapshot.value_by_class {
        Ok(rows) => renderer.bar_chart(QueryShape::ValueByClass, category_bars(rows)),
        Err(e) => renderer.failure(QueryShape::ValueByClass, e),
    }

    for (shape, result) in [
        (QueryShape::TopSubstancesByRom, &snapshot.top_substances),
        (QueryShape::TopRegionsByValue, &snapshot.top_regions),
    ] {
        match result {
            Ok(rows) => renderer.table(shape, ranking_table(shape, rows)),
            Err(e) => renderer.failure(shape, e),
        }
    }
}
