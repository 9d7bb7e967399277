//! Shared types, errors, and configuration for Lavra.
//!
//! This crate provides common types used across all other crates:
//! - Typed integer IDs for the dataset's dimension tables
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
