//! Snapshot Feature
//!
//! Builds an immutable `SymbolSnapshot` of one file version: top-level
//! declarations with normalized signatures, every export form and every import.
//!
//! ## Structure
//! - `domain` - snapshot and symbol models (serde)
//! - `infrastructure` - tree-sitter backed builder

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::{content_hash, SnapshotBuilder};
