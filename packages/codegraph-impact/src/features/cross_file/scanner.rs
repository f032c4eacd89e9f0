//! Project scanner
//!
//! Walks a project root, extracts and resolves module references of every
//! source file on a bounded rayon pool and merges the per-file results into a
//! [`ProjectGraph`] once all workers are done.

use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::dep_graph::ReverseDependencyGraph;
use super::export_graph::ExportGraph;
use super::module_resolver::ResolverChain;
use super::project_graph::ProjectGraph;
use super::specifiers::extract_references;
use super::types::{
    ExportRecord, ExportTarget, ExtractionTier, ModuleExports, ResolvedImport, ScanStats,
};
use crate::config::{ResolverConfig, ScanConfig};
use crate::errors::{CodegraphError, Result};
use crate::features::snapshot::domain::{ParseStatus, SymbolSnapshot};
use crate::features::snapshot::SnapshotBuilder;
use crate::shared::models::CanonicalPath;

/// Per-file result produced by a worker
#[derive(Debug)]
struct FileScan {
    path: CanonicalPath,
    edges: Vec<(CanonicalPath, u32)>,
    imports: Vec<ResolvedImport>,
    exports: ModuleExports,
    resolved: usize,
    unresolved: usize,
    degraded: bool,
    textual: bool,
}

#[derive(Debug)]
enum FileOutcome {
    Scanned(FileScan),
    Unreadable,
    Unscheduled,
}

/// Builds [`ProjectGraph`]s
#[derive(Debug, Clone, Default)]
pub struct ProjectScanner {
    scan: ScanConfig,
    resolver: ResolverConfig,
}

impl ProjectScanner {
    pub fn new(scan: ScanConfig, resolver: ResolverConfig) -> Self {
        Self { scan, resolver }
    }

    pub fn scan_config(&self) -> &ScanConfig {
        &self.scan
    }

    /// Scan `root`. Fails only when `root` is not a readable directory.
    pub fn scan(&self, root: &Path) -> Result<ProjectGraph> {
        let start = Instant::now();
        if !root.is_dir() {
            return Err(CodegraphError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("scan root is not a directory: {}", root.display()),
            )));
        }
        let root_key = CanonicalPath::new(root);

        let files = self.discover_files(root);
        let chain = ResolverChain::for_project(root, &self.resolver);
        let deadline = self
            .scan
            .time_budget_ms
            .map(|ms| start + Duration::from_millis(ms));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.scan.workers())
            .build()
            .map_err(|e| CodegraphError::internal(format!("scan pool: {}", e)))?;

        let outcomes: Vec<FileOutcome> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        return FileOutcome::Unscheduled;
                    }
                    scan_file(path, &chain)
                })
                .collect()
        });

        let mut graph = merge(root_key, outcomes);
        graph.stats.files_discovered = files.len();
        graph.stats.duration_ms = start.elapsed().as_millis() as u64;

        if graph.stats.timed_out {
            warn!(
                root = %graph.root,
                unscheduled = graph.stats.files_unscheduled,
                budget_ms = ?self.scan.time_budget_ms,
                "scan time budget exhausted, returning partial graph"
            );
        }
        info!(
            root = %graph.root,
            files = graph.stats.files_scanned,
            skipped = graph.stats.files_skipped,
            edges = graph.dependencies.edge_count(),
            exporting_modules = graph.exports.module_count(),
            unresolved = graph.stats.specifiers_unresolved,
            duration_ms = graph.stats.duration_ms,
            "project graph built"
        );
        Ok(graph)
    }

    /// Source files under `root`, sorted
    fn discover_files(&self, root: &Path) -> Vec<PathBuf> {
        let ignore = &self.scan.ignore_dirs;
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(self.scan.follow_links)
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !ignore.iter().any(|d| e.file_name().to_string_lossy() == d.as_str())
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "walk entry skipped");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext.to_string_lossy())
                    .is_some_and(|ext| self.scan.extensions.iter().any(|x| x.as_str() == ext))
            })
            .map(|e| e.into_path())
            .collect();
        files.sort();
        files
    }
}

fn scan_file(path: &Path, chain: &ResolverChain) -> FileOutcome {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "unreadable file skipped");
            return FileOutcome::Unreadable;
        }
    };
    let key = CanonicalPath::new(path);
    let snapshot = SnapshotBuilder::new().build(key.as_str(), &source);

    let mut cache: HashMap<String, Option<CanonicalPath>> = HashMap::new();
    let mut resolve = |specifier: &str| -> Option<CanonicalPath> {
        cache
            .entry(specifier.to_string())
            .or_insert_with(|| chain.resolve(&key, specifier))
            .clone()
    };

    let references = extract_references(&snapshot, &source);
    let textual = references.iter().any(|r| r.tier == ExtractionTier::Textual);
    let mut edges = Vec::with_capacity(references.len());
    let (mut resolved, mut unresolved) = (0, 0);
    for reference in &references {
        match resolve(&reference.specifier) {
            Some(target) => {
                resolved += 1;
                edges.push((target, reference.line));
            }
            None => unresolved += 1,
        }
    }

    let imports = snapshot
        .imports
        .iter()
        .filter_map(|import| {
            Some(ResolvedImport {
                target: resolve(&import.module_specifier)?,
                line: import.line.saturating_sub(1),
                bindings: import.bindings.clone(),
                kind: import.kind,
                is_type_only: import.is_type_only,
            })
        })
        .collect();

    let exports = module_exports(&snapshot, &mut resolve);

    debug!(file = %key, edges = edges.len(), unresolved, "file scanned");
    FileOutcome::Scanned(FileScan {
        degraded: !matches!(snapshot.parse_status, ParseStatus::Clean),
        path: key,
        edges,
        imports,
        exports,
        resolved,
        unresolved,
        textual,
    })
}

fn module_exports(
    snapshot: &SymbolSnapshot,
    resolve: &mut impl FnMut(&str) -> Option<CanonicalPath>,
) -> ModuleExports {
    let mut exports = ModuleExports::default();
    for export in &snapshot.exports {
        let line = export.line.saturating_sub(1);
        let Some(reexport) = &export.reexport else {
            exports.named.insert(
                export.name.clone(),
                ExportRecord {
                    name: export.name.clone(),
                    target: ExportTarget::Local {
                        local_name: export.local_name.clone().unwrap_or_else(|| export.name.clone()),
                    },
                    is_type_only: false,
                    line,
                },
            );
            continue;
        };
        let Some(source) = resolve(&reexport.source_module) else {
            continue;
        };
        if export.is_star() {
            if !exports.star_sources.contains(&source) {
                exports.star_sources.push(source);
            }
            continue;
        }
        exports.named.insert(
            export.name.clone(),
            ExportRecord {
                name: export.name.clone(),
                target: ExportTarget::Reexport {
                    source,
                    source_name: reexport.exported_name.clone(),
                },
                is_type_only: reexport.is_type_only,
                line,
            },
        );
    }
    exports
}

/// Single-threaded merge of worker results
fn merge(root: CanonicalPath, outcomes: Vec<FileOutcome>) -> ProjectGraph {
    let mut dependencies = ReverseDependencyGraph::new();
    let mut exports = ExportGraph::new();
    let mut imports = BTreeMap::new();
    let mut stats = ScanStats::default();

    for outcome in outcomes {
        match outcome {
            FileOutcome::Unreadable => stats.files_skipped += 1,
            FileOutcome::Unscheduled => {
                stats.files_unscheduled += 1;
                stats.timed_out = true;
            }
            FileOutcome::Scanned(scan) => {
                stats.files_scanned += 1;
                stats.files_degraded += usize::from(scan.degraded);
                stats.files_textual += usize::from(scan.textual);
                stats.specifiers_resolved += scan.resolved;
                stats.specifiers_unresolved += scan.unresolved;

                dependencies.add_file(&scan.path);
                for (target, line) in &scan.edges {
                    dependencies.add_import(&scan.path, target, *line);
                }
                if !scan.imports.is_empty() {
                    imports.insert(scan.path.clone(), scan.imports);
                }
                exports.insert(scan.path, scan.exports);
            }
        }
    }

    ProjectGraph {
        dependencies,
        exports,
        imports,
        stats,
        ..ProjectGraph::empty(root)
    }
}
