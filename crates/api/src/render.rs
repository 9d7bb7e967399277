//! JSON rendering of dashboard panels.

use chrono::{DateTime, Utc};
use lavra_core::dashboard::{
    Bar, DashboardError, DashboardSnapshot, Predicate, QueryShape, Renderer, SeriesPoint, Table,
    render_snapshot,
};
use lavra_core::dimension::{Dimension, DimensionOptions, FilterSelection, FilterValue};
use serde::Serialize;

/// Visual content of one panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelContent {
    /// Tabular panel.
    Table(Table),
    /// Line chart.
    LineChart {
        /// Points in ascending x order.
        points: Vec<SeriesPoint>,
    },
    /// Bar chart.
    BarChart {
        /// Bars in display order.
        bars: Vec<Bar>,
    },
    /// The panel's query failed.
    Failure {
        /// Error description.
        message: String,
    },
}

/// One rendered panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelView {
    /// Panel identifier.
    pub panel: QueryShape,
    /// What to draw.
    #[serde(flatten)]
    pub content: PanelContent,
}

/// Collects rendered panels in the order they are handed over.
#[derive(Debug, Default)]
pub struct JsonRenderer {
    panels: Vec<PanelView>,
}

impl JsonRenderer {
    /// Creates an empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the panels rendered so far.
    #[must_use]
    pub fn into_panels(self) -> Vec<PanelView> {
        self.panels
    }

    fn push(&mut self, panel: QueryShape, content: PanelContent) {
        self.panels.push(PanelView { panel, content });
    }
}

impl Renderer for JsonRenderer {
    fn table(&mut self, shape: QueryShape, table: Table) {
        self.push(shape, PanelContent::Table(table));
    }

    fn line_chart(&mut self, shape: QueryShape, points: Vec<SeriesPoint>) {
        self.push(shape, PanelContent::LineChart { points });
    }

    fn bar_chart(&mut self, shape: QueryShape, bars: Vec<Bar>) {
        self.push(shape, PanelContent::BarChart { bars });
    }

    fn failure(&mut self, shape: QueryShape, error: &DashboardError) {
        self.push(
            shape,
            PanelContent::Failure {
                message: error.to_string(),
            },
        );
    }
}

/// A selected value with no matching option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownValue {
    /// Dimension it was selected in.
    pub dimension: Dimension,
    /// The value itself.
    pub value: FilterValue,
}

/// Full dashboard for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    /// Selection the panels were computed for.
    pub selection: FilterSelection,
    /// Human-readable form of the shared predicate.
    pub predicate: String,
    /// Selected values that match no known option; they filter to nothing.
    pub unknown_values: Vec<UnknownValue>,
    /// When the panels were computed.
    pub generated_at: DateTime<Utc>,
    /// Panels in display order.
    pub panels: Vec<PanelView>,
}

impl DashboardResponse {
    /// Renders `snapshot` into its JSON form.
    #[must_use]
    pub fn from_snapshot(snapshot: &DashboardSnapshot, options: &DimensionOptions) -> Self {
        let mut renderer = JsonRenderer::new();
        render_snapshot(snapshot, &mut renderer);

        Self {
            selection: snapshot.selection.clone(),
            predicate: Predicate::build(&snapshot.selection).to_string(),
            unknown_values: options
                .unknown_values(&snapshot.selection)
                .into_iter()
                .map(|(dimension, value)| UnknownValue { dimension, value })
                .collect(),
            generated_at: snapshot.generated_at,
            panels: renderer.into_panels(),
        }
    }
}
