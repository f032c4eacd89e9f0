//! Section configuration types
//!
//! Each engine component has its own configuration struct with validation.

use serde::{Deserialize, Serialize};

use super::error::ConfigResult;
use super::preset::Preset;
use super::validation::{check_non_empty, check_range, Validatable};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Project scan
// ============================================================================

/// Project enumeration and graph build settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory names never descended into
    pub ignore_dirs: Vec<String>,

    /// Source file extensions (without dot)
    pub extensions: Vec<String>,

    /// Stop scheduling new files after this many milliseconds (1..=3600000)
    pub time_budget_ms: Option<u64>,

    /// Worker threads for file processing; 0 = number of CPUs (0..=256)
    pub parallel_workers: usize,

    /// Follow symlinked directories
    pub follow_links: bool,
}

impl ScanConfig {
    pub fn for_preset(preset: Preset) -> Self {
        Self {
            time_budget_ms: match preset {
                Preset::Fast => Some(5_000),
                Preset::Balanced => Some(30_000),
                Preset::Thorough => None,
            },
            ..Self::default()
        }
    }

    /// Effective worker count
    pub fn workers(&self) -> usize {
        if self.parallel_workers == 0 {
            num_cpus::get()
        } else {
            self.parallel_workers
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: strings(&[
                "node_modules",
                ".git",
                ".hg",
                ".svn",
                "dist",
                "build",
                "out",
                "coverage",
                ".next",
                ".turbo",
                "vendor",
                "bower_components",
            ]),
            extensions: strings(&["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"]),
            time_budget_ms: Some(30_000),
            parallel_workers: 0,
            follow_links: false,
        }
    }
}

impl Validatable for ScanConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_non_empty("scan.extensions", &self.extensions)?;
        if let Some(budget) = self.time_budget_ms {
            check_range(
                "scan.time_budget_ms",
                budget,
                1,
                3_600_000,
                "Omit the field to scan without a budget",
            )?;
        }
        check_range(
            "scan.parallel_workers",
            self.parallel_workers,
            0,
            256,
            "Use 0 to match the number of CPUs",
        )
    }
}

// ============================================================================
// Module resolution
// ============================================================================

/// Module specifier resolution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// tsconfig file name looked up at the project root
    pub tsconfig: String,

    /// Extensions probed for extensionless specifiers, in order
    pub probe_extensions: Vec<String>,

    /// Directory index file stems, in order
    pub index_files: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tsconfig: "tsconfig.json".to_string(),
            probe_extensions: strings(&[
                "ts", "tsx", "d.ts", "mts", "cts", "js", "jsx", "mjs", "cjs",
            ]),
            index_files: strings(&["index"]),
        }
    }
}

impl Validatable for ResolverConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_non_empty("resolver.probe_extensions", &self.probe_extensions)?;
        check_non_empty("resolver.index_files", &self.index_files)
    }
}

// ============================================================================
// Downstream propagation
// ============================================================================

/// Upper bound accepted for `impact.max_depth`
pub const MAX_PROPAGATION_DEPTH: usize = 4096;

/// Downstream impact propagation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropagationConfig {
    /// Accept textual occurrences as usage evidence
    pub text_fallback: bool,

    /// Optional cap on BFS depth from the changed file; `None` follows every
    /// importer. Resolutions that hit the cap are marked truncated.
    pub max_depth: Option<usize>,
}

impl PropagationConfig {
    pub fn for_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                text_fallback: false,
                max_depth: None,
            },
            Preset::Balanced | Preset::Thorough => Self::default(),
        }
    }
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            text_fallback: true,
            max_depth: None,
        }
    }
}

impl Validatable for PropagationConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.max_depth {
            Some(depth) => check_range(
                "impact.max_depth",
                depth,
                1,
                MAX_PROPAGATION_DEPTH,
                "Depth counts import hops from the changed file; omit it to follow every importer",
            ),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Snapshot diff
// ============================================================================

/// Snapshot differ settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Emit low-confidence rename hints for removed/added pairs
    pub rename_hints: bool,

    /// Minimum signature similarity for a rename hint (0.0..=1.0)
    pub rename_min_similarity: f64,
}

impl DiffConfig {
    pub fn for_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                rename_hints: false,
                ..Self::default()
            },
            Preset::Balanced => Self::default(),
            Preset::Thorough => Self {
                rename_hints: true,
                rename_min_similarity: 0.6,
            },
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            rename_hints: true,
            rename_min_similarity: 0.8,
        }
    }
}

impl Validatable for DiffConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "diff.rename_min_similarity",
            self.rename_min_similarity,
            0.0,
            1.0,
            "Similarity is a ratio",
        )
    }
}
