//! Project graph integration tests
//!
//! Scans small TypeScript projects on disk and checks reverse edges, import
//! lines, export records and the graph store.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use codegraph_impact::config::{ResolverConfig, ScanConfig};
use codegraph_impact::features::cross_file::{ExportTarget, ReexportVia};
use codegraph_impact::{DownstreamResolver, GraphStore, ProjectScanner};
use common::*;
use pretty_assertions::assert_eq;

fn layered_project() -> TestProject {
    TestProject::with_files(&[
        (
            "tsconfig.json",
            r#"{
  // aliases
  "compilerOptions": {
    "baseUrl": ".",
    "paths": { "@core/*": ["src/core/*"] },
  }
}"#,
        ),
        ("src/core/model.ts", "export interface User { id: string }\nexport function load(id: string): User { return { id }; }\n"),
        ("src/core/index.ts", "export * from './model';\nexport { load as fetchUser } from './model';\n"),
        ("src/api/handler.ts", "import { fetchUser } from '@core/index';\n\nexport const handle = (id: string) => fetchUser(id);\n"),
        ("src/api/legacy.js", "const model = require('../core/model');\nmodule.exports = model;\n"),
        ("src/app.ts", "import { handle } from './api/handler';\nconst lazy = import('./api/legacy');\nhandle('1');\n"),
        ("dist/app.js", "require('../src/app');\n"),
    ])
}

#[test]
fn test_reverse_edges_and_lines() {
    let project = layered_project();
    let graph = project.scan();

    assert_eq!(graph.stats.files_scanned, 5);
    assert!(!graph.contains(&project.key("dist/app.js")));

    let model = project.key("src/core/model.ts");
    assert_eq!(
        graph.dependencies.get_dependents(&model),
        vec![project.key("src/api/legacy.js"), project.key("src/core/index.ts")]
    );
    assert_eq!(
        graph.dependencies.import_line(&model, &project.key("src/core/index.ts")),
        Some(0)
    );

    let handler = project.key("src/api/handler.ts");
    assert_eq!(
        graph.dependencies.get_dependents(&project.key("src/core/index.ts")),
        vec![handler.clone()]
    );
    assert_eq!(
        graph.dependencies.import_line(&project.key("src/api/legacy.js"), &project.key("src/app.ts")),
        Some(1)
    );
}

#[test]
fn test_transitive_dependents() {
    let project = layered_project();
    let graph = project.scan();
    let mut all = graph
        .dependencies
        .get_transitive_dependents(&project.key("src/core/model.ts"));
    all.sort();
    assert_eq!(
        all,
        vec![
            project.key("src/api/handler.ts"),
            project.key("src/api/legacy.js"),
            project.key("src/app.ts"),
            project.key("src/core/index.ts"),
        ]
    );
}

#[test]
fn test_barrel_exports() {
    let project = layered_project();
    let graph = project.scan();
    let barrel = project.key("src/core/index.ts");
    let model = project.key("src/core/model.ts");

    let exports = graph.exports.exports_of(&barrel).unwrap();
    assert_eq!(exports.star_sources, vec![model.clone()]);
    match &exports.named["fetchUser"].target {
        ExportTarget::Reexport {
            source,
            source_name,
        } => {
            assert_eq!(source, &model);
            assert_eq!(source_name, "load");
        }
        other => panic!("expected re-export, got {:?}", other),
    }

    let via: Vec<ReexportVia> = graph
        .exports
        .reexporters_of(&model, Some("load"))
        .into_iter()
        .map(|r| r.via)
        .collect();
    assert!(via.contains(&ReexportVia::Named));
    assert!(via.contains(&ReexportVia::Star));

    assert_eq!(
        graph.exports.resolve_origin(&barrel, "User"),
        Some((model.clone(), "User".to_string()))
    );
    assert_eq!(
        graph.exports.resolve_origin(&barrel, "fetchUser"),
        Some((model, "load".to_string()))
    );
}

#[test]
fn test_cycles_reported() {
    let project = TestProject::with_files(&[
        ("a.ts", "import { b } from './b';\nexport const a = 1;\n"),
        ("b.ts", "import { a } from './a';\nexport const b = 2;\n"),
        ("c.ts", "import { a } from './a';\n"),
    ]);
    let graph = project.scan();
    assert!(graph.dependencies.has_cycles());
    let cycles = graph.dependencies.cycles();
    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].contains(&project.key("a.ts")));
    assert!(cycles[0].contains(&project.key("b.ts")));
    assert!(!cycles[0].contains(&project.key("c.ts")));
}

#[test]
fn test_custom_ignore_dirs_and_extensions() {
    let project = TestProject::with_files(&[
        ("src/a.ts", "export const a = 1;\n"),
        ("src/b.js", "import { a } from './a';\n"),
        ("generated/c.ts", "import { a } from '../src/a';\n"),
    ]);
    let scan = ScanConfig {
        ignore_dirs: vec!["generated".to_string()],
        extensions: vec!["ts".to_string()],
        ..ScanConfig::default()
    };
    let graph = ProjectScanner::new(scan, ResolverConfig::default())
        .scan(project.root())
        .unwrap();
    assert_eq!(graph.stats.files_scanned, 1);
    assert!(graph.dependencies.get_dependents(&project.key("src/a.ts")).is_empty());
}

#[test]
fn test_exhausted_time_budget_returns_partial_graph() {
    let project = layered_project();
    // A zero budget expires before the first file is scheduled
    let scan = ScanConfig {
        time_budget_ms: Some(0),
        ..ScanConfig::default()
    };
    let graph = ProjectScanner::new(scan, ResolverConfig::default())
        .scan(project.root())
        .unwrap();

    assert!(graph.timed_out());
    assert_eq!(graph.stats.files_discovered, 5);
    assert_eq!(graph.stats.files_scanned, 0);
    assert_eq!(
        graph.stats.files_scanned + graph.stats.files_skipped + graph.stats.files_unscheduled,
        graph.stats.files_discovered
    );

    let out = DownstreamResolver::default().resolve(&graph, &project.key("src/core/model.ts"), None);
    assert!(!out.is_resolved());
    assert!(out.partial_graph);
}

#[test]
fn test_resolution_over_timed_out_scan_is_partial() {
    let project = layered_project();
    let mut graph = project.scan();
    let model = project.key("src/core/model.ts");

    let complete = DownstreamResolver::default().resolve(&graph, &model, None);
    assert!(!complete.partial_graph);
    assert!(!complete.is_incomplete());

    graph.stats.timed_out = true;
    let partial = DownstreamResolver::default().resolve(&graph, &model, None);
    assert!(partial.is_resolved());
    assert!(partial.partial_graph);
    assert!(partial.is_incomplete());
    assert_eq!(partial.results, complete.results);
}

#[test]
fn test_graph_serializes() {
    let project = layered_project();
    let graph = project.scan();
    let json = serde_json::to_value(&graph).unwrap();
    assert_eq!(json["stats"]["files_scanned"], 5);
    assert!(json["imports"].is_object());
}

#[test]
fn test_graph_store_swaps_on_rebuild() {
    let project = TestProject::with_files(&[("a.ts", "export const a = 1;\n")]);
    let store = GraphStore::new(project.root(), ProjectScanner::default());
    assert!(store.current().is_none());

    let first = store.get_or_build().unwrap();
    let again = store.get_or_build().unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    project.write("b.ts", "import { a } from './a';\n");
    let second = store.rebuild().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.dependencies.edge_count(), 0);
    assert_eq!(second.dependencies.edge_count(), 1);

    store.invalidate();
    assert!(store.current().is_none());
}
