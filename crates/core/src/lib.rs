//! Core dashboard logic for Lavra.
//!
//! This crate contains pure logic with ZERO web or database dependencies.
//! Filter selections, predicate building, query definitions, result caching
//! and the rendering hand-off all live here.
//!
//! # Modules
//!
//! - `dimension` - Filter dimensions, selections and option lists
//! - `dashboard` - Predicate builder, query shapes, cache and snapshots

pub mod dashboard;
pub mod dimension;
