//! Patch types
//!
//! All-optional mirrors of the section configs. A YAML file only names the
//! fields it changes; everything else keeps the preset's value.

use serde::{Deserialize, Serialize};

use super::stage_configs::*;

/// Patch type for ScanConfig
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfigPatch {
    pub ignore_dirs: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    /// 0 disables the budget
    pub time_budget_ms: Option<u64>,
    pub parallel_workers: Option<usize>,
    pub follow_links: Option<bool>,
}

impl ScanConfigPatch {
    pub fn apply(self, base: &mut ScanConfig) {
        if let Some(v) = self.ignore_dirs {
            base.ignore_dirs = v;
        }
        if let Some(v) = self.extensions {
            base.extensions = v;
        }
        if let Some(v) = self.time_budget_ms {
            base.time_budget_ms = (v > 0).then_some(v);
        }
        if let Some(v) = self.parallel_workers {
            base.parallel_workers = v;
        }
        if let Some(v) = self.follow_links {
            base.follow_links = v;
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            ignore_dirs: Some(config.ignore_dirs.clone()),
            extensions: Some(config.extensions.clone()),
            time_budget_ms: Some(config.time_budget_ms.unwrap_or(0)),
            parallel_workers: Some(config.parallel_workers),
            follow_links: Some(config.follow_links),
        }
    }
}

/// Patch type for ResolverConfig
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfigPatch {
    pub tsconfig: Option<String>,
    pub probe_extensions: Option<Vec<String>>,
    pub index_files: Option<Vec<String>>,
}

impl ResolverConfigPatch {
    pub fn apply(self, base: &mut ResolverConfig) {
        if let Some(v) = self.tsconfig {
            base.tsconfig = v;
        }
        if let Some(v) = self.probe_extensions {
            base.probe_extensions = v;
        }
        if let Some(v) = self.index_files {
            base.index_files = v;
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            tsconfig: Some(config.tsconfig.clone()),
            probe_extensions: Some(config.probe_extensions.clone()),
            index_files: Some(config.index_files.clone()),
        }
    }
}

/// Patch type for PropagationConfig
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropagationConfigPatch {
    pub text_fallback: Option<bool>,
    pub max_depth: Option<usize>,
}

impl PropagationConfigPatch {
    pub fn apply(self, base: &mut PropagationConfig) {
        if let Some(v) = self.text_fallback {
            base.text_fallback = v;
        }
        if let Some(v) = self.max_depth {
            base.max_depth = Some(v);
        }
    }

    pub fn from_config(config: &PropagationConfig) -> Self {
        Self {
            text_fallback: Some(config.text_fallback),
            max_depth: config.max_depth,
        }
    }
}

/// Patch type for DiffConfig
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffConfigPatch {
    pub rename_hints: Option<bool>,
    pub rename_min_similarity: Option<f64>,
}

impl DiffConfigPatch {
    pub fn apply(self, base: &mut DiffConfig) {
        if let Some(v) = self.rename_hints {
            base.rename_hints = v;
        }
        if let Some(v) = self.rename_min_similarity {
            base.rename_min_similarity = v;
        }
    }

    pub fn from_config(config: &DiffConfig) -> Self {
        Self {
            rename_hints: Some(config.rename_hints),
            rename_min_similarity: Some(config.rename_min_similarity),
        }
    }
}
