//! Export graph
//!
//! Per-module export records with re-exports pointing at resolved source
//! modules. Barrel files become transparent: [`ExportGraph::resolve_origin`]
//! walks re-export chains back to the declaring module.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::types::{ExportTarget, ModuleExports};
use crate::shared::models::CanonicalPath;

/// How a module re-exposes another module's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReexportVia {
    /// `export { a } from`, `export { a as b } from`
    Named,
    /// `export * as ns from`
    Namespace,
    /// `export * from`
    Star,
}

/// A module re-exposing a name of some source module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reexposure {
    pub module: CanonicalPath,
    /// Name consumers of `module` see
    pub exposed_as: String,
    pub via: ReexportVia,
}

/// module → export records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportGraph {
    modules: BTreeMap<CanonicalPath, ModuleExports>,
}

impl ExportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: CanonicalPath, exports: ModuleExports) {
        if !exports.is_empty() {
            self.modules.insert(module, exports);
        }
    }

    pub fn exports_of(&self, module: &CanonicalPath) -> Option<&ModuleExports> {
        self.modules.get(module)
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Modules re-exporting `name` from `source`; `None` matches every name.
    ///
    /// Namespace re-exports always match. Star re-exports never carry `default`.
    pub fn reexporters_of(&self, source: &CanonicalPath, name: Option<&str>) -> Vec<Reexposure> {
        let mut out = Vec::new();
        for (module, exports) in &self.modules {
            if module == source {
                continue;
            }
            for record in exports.named.values() {
                let ExportTarget::Reexport {
                    source: from,
                    source_name,
                } = &record.target
                else {
                    continue;
                };
                if from != source {
                    continue;
                }
                if source_name == "*" {
                    out.push(Reexposure {
                        module: module.clone(),
                        exposed_as: record.name.clone(),
                        via: ReexportVia::Namespace,
                    });
                } else if name.map_or(true, |n| n == source_name) {
                    out.push(Reexposure {
                        module: module.clone(),
                        exposed_as: record.name.clone(),
                        via: ReexportVia::Named,
                    });
                }
            }
            if exports.star_sources.contains(source) {
                match name {
                    Some("default") => {}
                    Some(n) => out.push(Reexposure {
                        module: module.clone(),
                        exposed_as: n.to_string(),
                        via: ReexportVia::Star,
                    }),
                    None => out.push(Reexposure {
                        module: module.clone(),
                        exposed_as: "*".to_string(),
                        via: ReexportVia::Star,
                    }),
                }
            }
        }
        out
    }

    /// Follow re-exports of `name` in `module` to the declaring module and local name
    pub fn resolve_origin(&self, module: &CanonicalPath, name: &str) -> Option<(CanonicalPath, String)> {
        let mut visited = HashSet::new();
        self.resolve_inner(module, name, &mut visited)
    }

    fn resolve_inner(
        &self,
        module: &CanonicalPath,
        name: &str,
        visited: &mut HashSet<(CanonicalPath, String)>,
    ) -> Option<(CanonicalPath, String)> {
        if !visited.insert((module.clone(), name.to_string())) {
            return None;
        }
        let exports = self.modules.get(module)?;

        if let Some(record) = exports.named.get(name) {
            return match &record.target {
                ExportTarget::Local { local_name } => Some((module.clone(), local_name.clone())),
                ExportTarget::Reexport {
                    source,
                    source_name,
                } if source_name == "*" => Some((source.clone(), "*".to_string())),
                ExportTarget::Reexport {
                    source,
                    source_name,
                } => self
                    .resolve_inner(source, source_name, visited)
                    .or_else(|| Some((source.clone(), source_name.clone()))),
            };
        }

        if name == "default" {
            return None;
        }
        exports
            .star_sources
            .iter()
            .find_map(|source| self.resolve_inner(source, name, visited))
    }
}
