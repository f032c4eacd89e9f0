//! Downstream impact resolver
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! PHASES
//! ═══════════════════════════════════════════════════════════════════════════
//!
//! 1. Propagation: BFS from the changed file over the reverse graph. Every
//!    module that carries impacted names onward (a re-exporter, or any
//!    importer when no filter is given) records which names are visible
//!    through it. Visibility only grows, so the worklist terminates.
//! 2. Evidence: each reached file is read and searched for references to its
//!    bindings of visible names. Files without a reference are dropped under
//!    a filter; re-exporters are always kept.
//!
//! Results are sorted by depth, evidence tier, then path.

use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, info, warn};

use super::types::{
    DownstreamResult, Evidence, EvidenceTier, ImpactResolution, Relation, ResolutionStatus,
};
use super::usage::{LocalRef, UsageScan};
use crate::config::PropagationConfig;
use crate::features::cross_file::{ExportTarget, ProjectGraph, ReexportVia};
use crate::features::snapshot::domain::ImportBinding;
use crate::shared::models::CanonicalPath;

/// Names observable through a carrier module
#[derive(Debug, Clone, PartialEq, Eq)]
enum Visible {
    All,
    Names(BTreeSet<String>),
}

impl Visible {
    fn none() -> Self {
        Visible::Names(BTreeSet::new())
    }

    fn contains(&self, name: &str) -> bool {
        match self {
            Visible::All => true,
            Visible::Names(names) => names.contains(name),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Visible::Names(names) if names.is_empty())
    }

    /// Union; true when `self` grew
    fn merge(&mut self, other: &Visible) -> bool {
        match (&mut *self, other) {
            (Visible::All, _) => false,
            (_, Visible::All) => {
                *self = Visible::All;
                true
            }
            (Visible::Names(mine), Visible::Names(theirs)) => {
                let before = mine.len();
                mine.extend(theirs.iter().cloned());
                mine.len() != before
            }
        }
    }

    fn insert(&mut self, name: &str) {
        if let Visible::Names(names) = self {
            names.insert(name.to_string());
        }
    }
}

/// Propagation state for one resolution
#[derive(Debug)]
struct Propagation {
    /// carrier → names visible through it
    carriers: BTreeMap<CanonicalPath, Visible>,
    /// reached file → BFS depth
    depth: BTreeMap<CanonicalPath, u32>,
    reexporters: BTreeSet<CanonicalPath>,
    /// The depth cap stopped expansion with importers left unvisited
    truncated: bool,
}

/// Bindings of one file that reference visible names
#[derive(Debug, Default)]
struct Bindings {
    refs: Vec<LocalRef>,
    /// A named or default import of a visible name
    named_import: bool,
    /// Words for the textual tier
    words: BTreeSet<String>,
}

/// Finds files affected by a change to one file
#[derive(Debug, Clone, Default)]
pub struct DownstreamResolver {
    config: PropagationConfig,
}

impl DownstreamResolver {
    pub fn new(config: PropagationConfig) -> Self {
        Self { config }
    }

    /// Resolve files affected by `changed`. `names` filters by impacted export
    /// names; `None` returns every transitive importer.
    pub fn resolve(
        &self,
        graph: &ProjectGraph,
        changed: &CanonicalPath,
        names: Option<&[String]>,
    ) -> ImpactResolution {
        if !graph.contains(changed) {
            let mut resolution = ImpactResolution::not_attempted(
                changed.clone(),
                format!("{} is not part of the project graph", changed),
            );
            // A scan that ran out of time may simply not have reached the file
            resolution.partial_graph = graph.timed_out();
            return resolution;
        }

        let mut resolution = ImpactResolution {
            changed_file: changed.clone(),
            status: ResolutionStatus::Resolved,
            results: Vec::new(),
            partial_graph: graph.timed_out(),
            truncated: false,
        };
        if resolution.partial_graph {
            warn!(file = %changed, "resolving against a partial graph");
        }

        let filter = names.map(|n| n.iter().cloned().collect::<BTreeSet<String>>());
        if filter.as_ref().is_some_and(BTreeSet::is_empty) {
            debug!(file = %changed, "no impacted names, nothing to resolve");
            return resolution;
        }

        let propagation = self.propagate(graph, changed, filter.as_ref());
        let filtered = filter.is_some();
        if propagation.truncated {
            warn!(
                file = %changed,
                max_depth = ?self.config.max_depth,
                "depth cap reached, importers beyond it were not visited"
            );
        }

        let reached: Vec<(&CanonicalPath, u32)> = propagation
            .depth
            .iter()
            .filter(|(path, _)| *path != changed)
            .map(|(path, depth)| (path, *depth))
            .collect();

        let mut results: Vec<DownstreamResult> = reached
            .par_iter()
            .filter_map(|(file, depth)| {
                self.evaluate(graph, changed, &propagation, file, *depth, filtered)
            })
            .collect();

        results.sort_by(|a, b| {
            a.depth
                .cmp(&b.depth)
                .then(a.evidence.tier.cmp(&b.evidence.tier))
                .then_with(|| a.file_path.cmp(&b.file_path))
        });

        info!(
            file = %changed,
            reached = reached.len(),
            affected = results.len(),
            reexporters = propagation.reexporters.len(),
            filtered,
            "downstream impact resolved"
        );
        resolution.results = results;
        resolution.truncated = propagation.truncated;
        resolution
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Phase 1: propagation
    // ═══════════════════════════════════════════════════════════════════════

    fn propagate(
        &self,
        graph: &ProjectGraph,
        changed: &CanonicalPath,
        filter: Option<&BTreeSet<String>>,
    ) -> Propagation {
        let initial = match filter {
            Some(names) => Visible::Names(names.clone()),
            None => Visible::All,
        };
        let mut state = Propagation {
            carriers: BTreeMap::from([(changed.clone(), initial)]),
            depth: BTreeMap::from([(changed.clone(), 0)]),
            reexporters: BTreeSet::new(),
            truncated: false,
        };
        let max_depth = self.config.max_depth.map(|d| d as u32);
        let mut queue = VecDeque::from([changed.clone()]);

        while let Some(module) = queue.pop_front() {
            let depth = state.depth.get(&module).copied().unwrap_or(0);
            let visible = match state.carriers.get(&module) {
                Some(v) => v.clone(),
                None => continue,
            };

            let reexposed = reexposed_names(graph, &module, &visible);
            let mut candidates: BTreeSet<CanonicalPath> =
                graph.dependencies.get_dependents(&module).into_iter().collect();
            candidates.extend(reexposed.keys().cloned());
            candidates.remove(changed);

            if max_depth.is_some_and(|max| depth >= max) {
                if candidates.iter().any(|c| !state.depth.contains_key(c)) {
                    state.truncated = true;
                }
                continue;
            }

            for importer in candidates {
                let entry = state.depth.entry(importer.clone()).or_insert(depth + 1);
                *entry = (*entry).min(depth + 1);

                let mut exposed = local_reexports(graph, &importer, &module, &visible);
                if let Some(names) = reexposed.get(&importer) {
                    exposed.merge(names);
                }
                if !exposed.is_empty() {
                    state.reexporters.insert(importer.clone());
                }
                let onward = if filter.is_none() { Visible::All } else { exposed };
                if onward.is_empty() {
                    continue;
                }
                let grew = match state.carriers.get_mut(&importer) {
                    Some(existing) => existing.merge(&onward),
                    None => {
                        state.carriers.insert(importer.clone(), onward);
                        true
                    }
                };
                if grew {
                    queue.push_back(importer);
                }
            }
        }

        debug!(
            carriers = state.carriers.len(),
            reached = state.depth.len().saturating_sub(1),
            "propagation finished"
        );
        state
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Phase 2: evidence
    // ═══════════════════════════════════════════════════════════════════════

    fn evaluate(
        &self,
        graph: &ProjectGraph,
        changed: &CanonicalPath,
        propagation: &Propagation,
        file: &CanonicalPath,
        depth: u32,
        filtered: bool,
    ) -> Option<DownstreamResult> {
        let is_reexporter = propagation.reexporters.contains(file);
        let bindings = bindings_of(graph, file, &propagation.carriers);

        let evidence = match std::fs::read_to_string(file.to_path_buf()) {
            Ok(source) => self.find_evidence(graph, changed, file, &source, &bindings),
            Err(e) => {
                warn!(file = %file, error = %e, "downstream file unreadable");
                None
            }
        };

        let referenced = bindings.named_import
            || evidence.is_some_and(|e| {
                matches!(e.tier, EvidenceTier::Usage | EvidenceTier::TextMatch)
            });
        if filtered && !is_reexporter && !referenced {
            debug!(file = %file, "importer does not reference impacted names");
            return None;
        }

        let evidence = evidence
            .or_else(|| {
                graph
                    .dependencies
                    .import_line(changed, file)
                    .map(|line| Evidence::known(line, EvidenceTier::ImportStatement))
            })
            .unwrap_or_else(Evidence::unknown);

        let relation = if is_reexporter {
            Relation::Reexporter
        } else if depth == 1 {
            Relation::DirectImporter
        } else {
            Relation::Transitive
        };

        Some(DownstreamResult {
            file_path: file.clone(),
            evidence,
            relation,
            depth,
        })
    }

    /// Usage, then text, then the statement importing the changed file
    fn find_evidence(
        &self,
        graph: &ProjectGraph,
        changed: &CanonicalPath,
        file: &CanonicalPath,
        source: &str,
        bindings: &Bindings,
    ) -> Option<Evidence> {
        let scan = UsageScan::new(file, source);
        if let Some(row) = scan.structural(&bindings.refs) {
            return Some(Evidence::known(row, EvidenceTier::Usage));
        }
        if self.config.text_fallback {
            let words: Vec<&str> = bindings.words.iter().map(String::as_str).collect();
            if let Some(row) = scan.textual(&words) {
                return Some(Evidence::known(row, EvidenceTier::TextMatch));
            }
        }
        graph
            .dependencies
            .import_line(changed, file)
            .map(|line| Evidence::known(line, EvidenceTier::ImportStatement))
    }
}

/// Names each module re-exporting from `carrier` (`export .. from`) exposes,
/// given what `carrier` shows
fn reexposed_names(
    graph: &ProjectGraph,
    carrier: &CanonicalPath,
    visible: &Visible,
) -> BTreeMap<CanonicalPath, Visible> {
    let found = match visible {
        Visible::All => graph.exports.reexporters_of(carrier, None),
        Visible::Names(names) => names
            .iter()
            .flat_map(|name| graph.exports.reexporters_of(carrier, Some(name.as_str())))
            .collect(),
    };

    let mut out: BTreeMap<CanonicalPath, Visible> = BTreeMap::new();
    for reexposure in found {
        let exposed = out.entry(reexposure.module).or_insert_with(Visible::none);
        match reexposure.via {
            // `export * from` under no filter passes everything through
            ReexportVia::Star if reexposure.exposed_as == "*" => {
                exposed.merge(&Visible::All);
            }
            ReexportVia::Star | ReexportVia::Named | ReexportVia::Namespace => {
                exposed.insert(&reexposure.exposed_as);
            }
        }
    }
    out
}

/// Names `importer` imports from `carrier` and exports again (`import { a }`
/// followed by `export { a as b }`)
fn local_reexports(
    graph: &ProjectGraph,
    importer: &CanonicalPath,
    carrier: &CanonicalPath,
    visible: &Visible,
) -> Visible {
    let mut exposed = Visible::none();
    let Some(exports) = graph.exports.exports_of(importer) else {
        return exposed;
    };

    // Imported names, keyed by local binding
    let mut imported: BTreeMap<&str, &str> = BTreeMap::new();
    for import in graph.imports_between(importer, carrier) {
        for binding in &import.bindings {
            let name = match binding {
                ImportBinding::Named { imported, .. } => imported.as_str(),
                ImportBinding::Default { .. } => "default",
                ImportBinding::Namespace { .. } => "*",
            };
            imported.insert(binding.local(), name);
        }
    }

    for record in exports.named.values() {
        let ExportTarget::Local { local_name } = &record.target else {
            continue;
        };
        let carried = match imported.get(local_name.as_str()) {
            Some(&"*") => !visible.is_empty(),
            Some(name) => visible.contains(name),
            None => false,
        };
        if carried {
            exposed.insert(&record.name);
        }
    }
    exposed
}

/// References in `file` to names visible through the carriers it imports
fn bindings_of(
    graph: &ProjectGraph,
    file: &CanonicalPath,
    carriers: &BTreeMap<CanonicalPath, Visible>,
) -> Bindings {
    let mut bindings = Bindings::default();
    let Some(imports) = graph.imports.get(file) else {
        return bindings;
    };

    for import in imports {
        let Some(visible) = carriers.get(&import.target) else {
            continue;
        };
        for binding in &import.bindings {
            match binding {
                ImportBinding::Named { imported, local } if visible.contains(imported) => {
                    bindings.refs.push(LocalRef::plain(local.clone()));
                    bindings.words.insert(local.clone());
                    bindings.named_import = true;
                }
                ImportBinding::Default { local } if visible.contains("default") => {
                    bindings.refs.push(LocalRef::plain(local.clone()));
                    bindings.words.insert(local.clone());
                    bindings.named_import = true;
                }
                ImportBinding::Namespace { local } => match visible {
                    Visible::All => {
                        bindings.refs.push(LocalRef::plain(local.clone()));
                        bindings.words.insert(local.clone());
                    }
                    Visible::Names(names) => {
                        for name in names {
                            bindings.refs.push(LocalRef::member(local.clone(), name.clone()));
                            bindings.words.insert(name.clone());
                        }
                    }
                },
                _ => {}
            }
        }
        // Bindingless imports (side effect, bare dynamic import) can only match textually
        if import.bindings.is_empty() {
            if let Visible::Names(names) = visible {
                bindings.words.extend(names.iter().filter(|n| n.as_str() != "default").cloned());
            }
        }
    }
    bindings
}
