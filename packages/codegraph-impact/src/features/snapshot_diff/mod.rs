//! Structural diff between two snapshots of one file

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::{classify_modification, SnapshotDiffer};
