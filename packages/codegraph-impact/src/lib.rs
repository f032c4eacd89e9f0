/*
 * Codegraph Impact - Breaking-change classification and downstream impact
 *
 * Feature-First Architecture:
 * - shared/      : Canonical path keys, text and tree-sitter helpers
 * - features/    : Vertical slices (parsing → snapshot → snapshot_diff → cross_file → impact)
 * - pipeline/    : Change analysis orchestration (diff then impact)
 * - config/      : Presets, YAML loading, environment overrides
 *
 * Concurrency:
 * - Synchronous API
 * - Rayon pools for project scans and usage searches
 * - Graph store swaps whole graphs behind an Arc
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Resolver helpers thread graph + state explicitly
#![allow(clippy::type_complexity)] // Nested BTreeMaps for evidence maps
#![allow(clippy::collapsible_if)] // Readability over brevity
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::unnecessary_map_or)] // map_or style for compatibility

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (snapshot, diff, graph, impact)
pub mod features;

/// Change analysis orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{ImpactConfig, Preset};
pub use errors::{CodegraphError, Result};
pub use features::cross_file::{GraphStore, ProjectGraph, ProjectScanner};
pub use features::impact::{
    DownstreamResolver, DownstreamResult, EvidenceLine, EvidenceTier, ImpactResolution, Relation,
    ResolutionStatus,
};
pub use features::snapshot::{SnapshotBuilder, SymbolSnapshot};
pub use features::snapshot_diff::{SnapshotDiff, SnapshotDiffer};
pub use pipeline::{ChangeAnalyzer, ChangeReport};
pub use shared::models::CanonicalPath;
