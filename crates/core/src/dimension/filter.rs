//! Filter selections over the dashboard's dimensions.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A categorical or temporal axis the dashboard filters and groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Federative unit (`UF.sigla_uf`).
    Region,
    /// Substance class (`CLASSE_SUBSTANCIA.nome_classe`).
    Class,
    /// Mineral substance (`SUBSTANCIA_MINERAL.nome_substancia`).
    Substance,
    /// Reference year (`ANO.ano`).
    Year,
}

impl Dimension {
    /// All dimensions in predicate clause order.
    pub const ALL: [Self; 4] = [Self::Region, Self::Class, Self::Substance, Self::Year];

    /// Qualified column the dimension filters on, using the fixed join aliases.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Region => "u.sigla_uf",
            Self::Class => "c.nome_classe",
            Self::Substance => "s.nome_substancia",
            Self::Year => "a.ano",
        }
    }

    /// Lowercase name used in logs and API payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Class => "class",
            Self::Substance => "substance",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single selected value, bound as a query parameter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Year values.
    Integer(i32),
    /// Region codes, class names and substance names.
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value:?}"),
        }
    }
}

/// The user's current filter choices.
///
/// Each set may be empty, meaning "no constraint on this dimension". Sets are
/// ordered so that two selections with the same values compare equal
/// regardless of the order the user picked them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    /// Selected region codes.
    pub regions: BTreeSet<String>,
    /// Selected substance class names.
    pub classes: BTreeSet<String>,
    /// Selected substance names.
    pub substances: BTreeSet<String>,
    /// Selected years.
    pub years: BTreeSet<i32>,
}

impl FilterSelection {
    /// Creates an empty selection (matches everything).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region code to the selection.
    #[must_use]
    pub fn with_region(mut self, code: impl Into<String>) -> Self {
        self.regions.insert(code.into());
        self
    }

    /// Adds a substance class to the selection.
    #[must_use]
    pub fn with_class(mut self, name: impl Into<String>) -> Self {
        self.classes.insert(name.into());
        self
    }

    /// Adds a substance to the selection.
    #[must_use]
    pub fn with_substance(mut self, name: impl Into<String>) -> Self {
        self.substances.insert(name.into());
        self
    }

    /// Adds a year to the selection.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.years.insert(year);
        self
    }

    /// Returns true if no dimension is constrained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Dimension::ALL.iter().all(|&dimension| self.len(dimension) == 0)
    }

    /// Number of values selected for a dimension.
    #[must_use]
    pub fn len(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Region => self.regions.len(),
            Dimension::Class => self.classes.len(),
            Dimension::Substance => self.substances.len(),
            Dimension::Year => self.years.len(),
        }
    }

    /// Selected values for a dimension, in sorted order.
    #[must_use]
    pub fn values(&self, dimension: Dimension) -> Vec<FilterValue> {
        let text = |set: &BTreeSet<String>| set.iter().cloned().map(FilterValue::Text).collect();
        match dimension {
            Dimension::Region => text(&self.regions),
            Dimension::Class => text(&self.classes),
            Dimension::Substance => text(&self.substances),
            Dimension::Year => self.years.iter().copied().map(FilterValue::Integer).collect(),
        }
    }
}
