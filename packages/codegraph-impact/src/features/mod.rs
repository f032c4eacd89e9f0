//! Feature modules
//!
//! Each feature is a vertical slice:
//! - domain/         - Plain data types (serde, no IO)
//! - infrastructure/ - tree-sitter, filesystem and graph implementations
//!
//! Leaves first: parsing → snapshot → snapshot_diff → cross_file → impact.

pub mod parsing;

// Per-file symbol snapshots
pub mod snapshot;

// Structural diff + rule cascade
pub mod snapshot_diff;

// Reverse dependency and export graphs
pub mod cross_file;

// Downstream impact resolution
pub mod impact;
