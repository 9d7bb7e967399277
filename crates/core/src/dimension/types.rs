//! Dimension lookup types used to populate filter options.

use lavra_shared::types::{ClassId, RegionId, SubstanceId, YearId};
use serde::{Deserialize, Serialize};

use super::filter::{Dimension, FilterSelection, FilterValue};

/// A federative unit. The dataset carries only the code, which is also what
/// the dashboard displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Region ID.
    pub id: RegionId,
    /// Short code, e.g. `MG`.
    pub code: String,
}

/// A reference year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Year {
    /// Year ID.
    pub id: YearId,
    /// Calendar year.
    pub year: i32,
}

/// A substance class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstanceClass {
    /// Class ID.
    pub id: ClassId,
    /// Class name.
    pub name: String,
}

/// A mineral substance and the class it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substance {
    /// Substance ID.
    pub id: SubstanceId,
    /// Substance name.
    pub name: String,
    /// Name of the owning class.
    pub class_name: String,
}

/// Snapshot of every filter option list, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionOptions {
    /// Regions ordered by code.
    pub regions: Vec<Region>,
    /// Years in ascending order.
    pub years: Vec<Year>,
    /// Classes ordered by name.
    pub classes: Vec<SubstanceClass>,
    /// Substances ordered by name.
    pub substances: Vec<Substance>,
}

impl DimensionOptions {
    /// Returns true if `value` is one of the known options for `dimension`.
    #[must_use]
    pub fn contains(&self, dimension: Dimension, value: &FilterValue) -> bool {
        match (dimension, value) {
            (Dimension::Region, FilterValue::Text(code)) => {
                self.regions.iter().any(|r| &r.code == code)
            }
            (Dimension::Class, FilterValue::Text(name)) => {
                self.classes.iter().any(|c| &c.name == name)
            }
            (Dimension::Substance, FilterValue::Text(name)) => {
                self.substances.iter().any(|s| &s.name == name)
            }
            (Dimension::Year, FilterValue::Integer(year)) => {
                self.years.iter().any(|y| y.year == *year)
            }
            _ => false,
        }
    }

    /// Selected values that are not among the known options.
    ///
    /// Unknown values are still bound as literal filters and simply match
    /// nothing; callers use this only for diagnostics.
    #[must_use]
    pub fn unknown_values(&self, selection: &FilterSelection) -> Vec<(Dimension, FilterValue)> {
        Dimension::ALL
            .into_iter()
            .flat_map(|dimension| {
                selection
                    .values(dimension)
                    .into_iter()
                    .filter(move |value| !self.contains(dimension, value))
                    .map(move |value| (dimension, value))
            })
            .collect()
    }
}
