//! Shared module - Common types and utilities
//!
//! This module contains types that are shared across all features.

pub mod models;
pub mod utils;

pub use models::*;
