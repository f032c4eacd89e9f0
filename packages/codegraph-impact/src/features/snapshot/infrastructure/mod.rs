//! Snapshot infrastructure

mod builder;

pub use builder::{content_hash, SnapshotBuilder};
