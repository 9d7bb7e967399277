//! Predicate builder.
//!
//! Turns a [`FilterSelection`] into one `WHERE` fragment plus the values bound
//! to its placeholders. The fragment is shared verbatim by every dashboard
//! query. Column names are fixed identifiers; selected values only ever
//! travel as bound parameters.

use std::fmt;

use crate::dimension::{Dimension, FilterSelection, FilterValue};

/// `column IN (...)` restriction for one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InClause {
    dimension: Dimension,
    values: Vec<FilterValue>,
}

impl InClause {
    /// The constrained dimension.
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Accepted values, never empty.
    #[must_use]
    pub fn values(&self) -> &[FilterValue] {
        &self.values
    }
}

impl fmt::Display for InClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} IN [", self.dimension)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

/// A value bound to a numbered placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// 1-based placeholder number, unique across the whole predicate.
    pub ordinal: usize,
    /// Dimension the value filters.
    pub dimension: Dimension,
    /// The bound value.
    pub value: FilterValue,
}

impl Binding {
    /// Placeholder text as it appears in the SQL, e.g. `?3`.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("?{}", self.ordinal)
    }
}

/// Conjunction of `IN` clauses derived from a selection.
///
/// Equality and hashing follow the selected values per dimension, which makes
/// the predicate usable directly as part of a cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Predicate {
    clauses: Vec<InClause>,
}

impl Predicate {
    /// Builds the predicate for a selection.
    ///
    /// Empty sets contribute no clause. Clauses follow [`Dimension::ALL`]
    /// order: region, class, substance, year.
    #[must_use]
    pub fn build(selection: &FilterSelection) -> Self {
        let clauses = Dimension::ALL
            .into_iter()
            .filter_map(|dimension| {
                let values = selection.values(dimension);
                (!values.is_empty()).then_some(InClause { dimension, values })
            })
            .collect();

        Self { clauses }
    }

    /// Returns true if the predicate matches every record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The clauses in rendering order.
    #[must_use]
    pub fn clauses(&self) -> &[InClause] {
        &self.clauses
    }

    /// Number of bound parameters.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.clauses.iter().map(|c| c.values.len()).sum()
    }

    /// Every binding with its placeholder ordinal.
    #[must_use]
    pub fn bindings(&self) -> Vec<Binding> {
        self.clauses
            .iter()
            .flat_map(|clause| {
                clause
                    .values
                    .iter()
                    .map(move |value| (clause.dimension, value.clone()))
            })
            .enumerate()
            .map(|(i, (dimension, value))| Binding {
                ordinal: i + 1,
                dimension,
                value,
            })
            .collect()
    }

    /// Bound values in placeholder order.
    #[must_use]
    pub fn values(&self) -> Vec<FilterValue> {
        self.clauses
            .iter()
            .flat_map(|clause| clause.values.iter().cloned())
            .collect()
    }

    /// Renders the `WHERE` fragment, or an empty string for an empty predicate.
    #[must_use]
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            return String::new();
        }

        let mut ordinal = 0;
        let conditions: Vec<String> = self
            .clauses
            .iter()
            .map(|clause| {
                let placeholders: Vec<String> = clause
                    .values
                    .iter()
                    .map(|_| {
                        ordinal += 1;
                        format!("?{ordinal}")
                    })
                    .collect();
                format!(
                    "{} IN ({})",
                    clause.dimension.column(),
                    placeholders.join(", ")
                )
            })
            .collect();

        format!("WHERE {}", conditions.join(" AND "))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            return f.write_str("(all records)");
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

impl From<&FilterSelection> for Predicate {
    fn from(selection: &FilterSelection) -> Self {
        Self::build(selection)
    }
}
