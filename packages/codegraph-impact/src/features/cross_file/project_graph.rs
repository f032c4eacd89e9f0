//! Project graph: everything one scan of a root produces

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::dep_graph::ReverseDependencyGraph;
use super::export_graph::ExportGraph;
use super::types::{ResolvedImport, ScanStats};
use crate::shared::models::CanonicalPath;

/// Immutable result of scanning a project root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectGraph {
    pub root: CanonicalPath,
    pub built_at: DateTime<Utc>,
    pub dependencies: ReverseDependencyGraph,
    pub exports: ExportGraph,
    /// importer → resolved imports, in source order
    pub imports: BTreeMap<CanonicalPath, Vec<ResolvedImport>>,
    pub stats: ScanStats,
}

impl ProjectGraph {
    pub fn empty(root: CanonicalPath) -> Self {
        Self {
            root,
            built_at: Utc::now(),
            dependencies: ReverseDependencyGraph::new(),
            exports: ExportGraph::new(),
            imports: BTreeMap::new(),
            stats: ScanStats::default(),
        }
    }

    pub fn contains(&self, file: &CanonicalPath) -> bool {
        self.dependencies.contains(file)
    }

    /// Imports in `importer` resolving to `target`
    pub fn imports_between<'a>(
        &'a self,
        importer: &CanonicalPath,
        target: &'a CanonicalPath,
    ) -> impl Iterator<Item = &'a ResolvedImport> + 'a {
        self.imports
            .get(importer)
            .into_iter()
            .flatten()
            .filter(move |import| &import.target == target)
    }

    pub fn timed_out(&self) -> bool {
        self.stats.timed_out
    }
}
