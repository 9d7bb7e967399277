//! Dimensions, filter selections and option lists.
//!
//! This module provides:
//! - The four filterable dimensions and their column mapping
//! - `FilterSelection`, the user's current choices
//! - `DimensionOptions`, the option lists shown to the user

pub mod filter;
pub mod types;

pub use filter::{Dimension, FilterSelection, FilterValue};
pub use types::{DimensionOptions, Region, Substance, SubstanceClass, Year};
