//! Downstream impact integration tests
//!
//! Resolves affected files over scanned projects, covering barrels, name
//! filtering, evidence tiers and determinism.

#[path = "../common/mod.rs"]
mod common;

use codegraph_impact::config::PropagationConfig;
use codegraph_impact::features::impact::Evidence;
use codegraph_impact::{
    ChangeAnalyzer, DownstreamResolver, EvidenceLine, EvidenceTier, ImpactConfig, Preset,
    Relation, ResolutionStatus,
};
use common::*;
use pretty_assertions::assert_eq;

#[test]
fn test_barrel_chain_returns_reexporter_and_consumer() {
    let project = TestProject::with_files(&[
        ("a.ts", "export function X() {}\nexport function other() {}\n"),
        ("b.ts", "export { X } from './a';\n"),
        ("c.ts", "import { X } from './b';\n\nconst ready = true;\nX();\n"),
    ]);
    let graph = project.scan();
    let out = DownstreamResolver::default().resolve(&graph, &project.key("a.ts"), Some(&names(&["X"])));

    assert_eq!(out.status, ResolutionStatus::Resolved);
    assert_affected(&out, &[project.key("b.ts"), project.key("c.ts")]);

    let b = out.get(&project.key("b.ts")).unwrap();
    assert_eq!(b.relation, Relation::Reexporter);
    assert_eq!(b.depth, 1);

    let c = out.get(&project.key("c.ts")).unwrap();
    assert_eq!(c.relation, Relation::Transitive);
    assert_eq!(c.depth, 2);
    assert_eq!(c.evidence, Evidence::known(3, EvidenceTier::Usage));
    assert_eq!(c.evidence.line.to_string(), "4");
}

#[test]
fn test_no_filter_returns_every_transitive_importer() {
    let project = TestProject::with_files(&[
        ("core.ts", "export const value = 1;\nexport const unused = 2;\n"),
        ("mid.ts", "import { value } from './core';\nexport const doubled = value * 2;\n"),
        ("leaf.ts", "import { doubled } from './mid';\nconsole.log(doubled);\n"),
        ("side.ts", "import './core';\n"),
        ("unrelated.ts", "export const nothing = 0;\n"),
    ]);
    let graph = project.scan();
    let core = project.key("core.ts");
    let out = DownstreamResolver::default().resolve(&graph, &core, None);

    let mut expected = graph.dependencies.get_transitive_dependents(&core);
    expected.sort();
    let mut actual: Vec<_> = out.files().cloned().collect();
    actual.sort();
    assert_eq!(actual, expected);
    assert_eq!(actual.len(), 3);
}

/// `m0 <- m1 <- ... <- m{len-1}`, each module re-using the previous one
fn chain_project(len: usize) -> TestProject {
    let project = TestProject::new();
    project.write("m0.ts", "export const v0 = 0;\n");
    for i in 1..len {
        project.write(
            &format!("m{}.ts", i),
            &format!("import {{ v{p} }} from './m{p}';\nexport const v{i} = v{p} + 1;\n", p = i - 1, i = i),
        );
    }
    project
}

#[test]
fn test_long_chain_reaches_every_transitive_importer() {
    let project = chain_project(13);
    let graph = project.scan();
    let m0 = project.key("m0.ts");
    assert_eq!(graph.dependencies.get_transitive_dependents(&m0).len(), 12);

    for preset in [Preset::Fast, Preset::Balanced, Preset::Thorough] {
        let resolver = DownstreamResolver::new(ImpactConfig::preset(preset).impact);
        let out = resolver.resolve(&graph, &m0, None);
        assert_eq!(out.results.len(), 12, "preset {}", preset);
        assert!(!out.truncated);
        let deepest = out.results.last().unwrap();
        assert_eq!(deepest.file_path, project.key("m12.ts"));
        assert_eq!(deepest.depth, 12);
    }
}

#[test]
fn test_depth_cap_marks_resolution_truncated() {
    let project = chain_project(13);
    let graph = project.scan();
    let config = PropagationConfig {
        max_depth: Some(4),
        ..PropagationConfig::default()
    };
    let out = DownstreamResolver::new(config).resolve(&graph, &project.key("m0.ts"), None);

    assert_eq!(out.results.len(), 4);
    assert!(out.truncated);
    assert!(out.is_incomplete());
    assert!(!out.partial_graph);
}

#[test]
fn test_filter_excludes_non_referencing_importers() {
    let project = TestProject::with_files(&[
        ("a.ts", "export function X() {}\nexport function Y() {}\n"),
        ("uses_x.ts", "import { X } from './a';\nX();\n"),
        ("uses_y.ts", "import { Y } from './a';\nY();\n"),
        ("star.ts", "import * as a from './a';\na.Y();\n"),
    ]);
    let graph = project.scan();
    let out = DownstreamResolver::default().resolve(&graph, &project.key("a.ts"), Some(&names(&["X"])));

    assert_affected(&out, &[project.key("uses_x.ts")]);
    let hit = &out.results[0];
    assert_eq!(hit.relation, Relation::DirectImporter);
    assert_eq!(hit.evidence, Evidence::known(1, EvidenceTier::Usage));
}

#[test]
fn test_transitive_file_without_usage_is_unknown() {
    let project = TestProject::with_files(&[
        ("a.ts", "export const a = 1;\n"),
        ("b.ts", "import { a } from './a';\nexport const b = a;\n"),
        ("c.ts", "import { b } from './b';\n"),
    ]);
    let graph = project.scan();
    let out = DownstreamResolver::default().resolve(&graph, &project.key("a.ts"), None);

    let c = out.get(&project.key("c.ts")).expect("transitive importer kept");
    assert_eq!(c.depth, 2);
    assert_eq!(c.evidence.line, EvidenceLine::Unknown);
    assert_eq!(c.evidence.tier, EvidenceTier::Unknown);
    assert_eq!(c.evidence.line.to_string(), "?");
}

#[test]
fn test_direct_importer_without_usage_points_at_import() {
    let project = TestProject::with_files(&[
        ("a.ts", "export const a = 1;\n"),
        ("b.ts", "// setup\nimport { a } from './a';\n"),
    ]);
    let graph = project.scan();
    let out = DownstreamResolver::default().resolve(&graph, &project.key("a.ts"), None);
    let b = out.get(&project.key("b.ts")).unwrap();
    assert_eq!(b.evidence, Evidence::known(1, EvidenceTier::ImportStatement));
}

#[test]
fn test_text_fallback_tier() {
    let project = TestProject::with_files(&[
        ("a.ts", "export function X() {}\n"),
        ("register.ts", "import './a';\n\nconst entry = 'X';\n"),
    ]);
    let graph = project.scan();
    let file = project.key("a.ts");

    let out = DownstreamResolver::default().resolve(&graph, &file, Some(&names(&["X"])));
    let hit = out.get(&project.key("register.ts")).unwrap();
    assert_eq!(hit.evidence, Evidence::known(2, EvidenceTier::TextMatch));
    assert!(hit.evidence.tier.is_heuristic());

    let structural_only = DownstreamResolver::new(PropagationConfig {
        text_fallback: false,
        ..PropagationConfig::default()
    });
    let out = structural_only.resolve(&graph, &file, Some(&names(&["X"])));
    assert!(out.results.is_empty());
}

#[test]
fn test_results_ranked_by_depth_tier_path() {
    let project = TestProject::with_files(&[
        ("a.ts", "export const a = 1;\n"),
        ("z.ts", "import { a } from './a';\nconsole.log(a);\n"),
        ("m.ts", "import { a } from './a';\n"),
        ("b.ts", "import { a } from './a';\nexport const b = a;\n"),
        ("deep.ts", "import { b } from './b';\nconsole.log(b);\n"),
    ]);
    let graph = project.scan();
    let out = DownstreamResolver::default().resolve(&graph, &project.key("a.ts"), None);
    assert_affected(
        &out,
        &[
            project.key("b.ts"),
            project.key("z.ts"),
            project.key("m.ts"),
            project.key("deep.ts"),
        ],
    );
}

#[test]
fn test_repeated_resolution_is_identical() {
    let project = TestProject::with_files(&[
        ("a.ts", "export function X() {}\nexport default class Widget {}\n"),
        ("b.ts", "export * from './a';\nexport { default as Widget } from './a';\n"),
        ("c.ts", "import { X, Widget } from './b';\nnew Widget();\nX();\n"),
        ("d.ts", "import Widget from './a';\nconst w = new Widget();\n"),
    ]);
    let graph = project.scan();
    let resolver = DownstreamResolver::default();
    let filter = names(&["X", "default"]);

    let first = resolver.resolve(&graph, &project.key("a.ts"), Some(&filter));
    let second = resolver.resolve(&graph, &project.key("a.ts"), Some(&filter));
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first.results.len(), 3);
}

#[test]
fn test_unknown_file_is_not_attempted() {
    let project = TestProject::with_files(&[("a.ts", "export const a = 1;\n")]);
    let graph = project.scan();
    let out = DownstreamResolver::default().resolve(&graph, &project.key("missing.ts"), None);
    assert!(matches!(out.status, ResolutionStatus::NotAttempted { .. }));
    assert!(out.results.is_empty());
}

#[test]
fn test_change_analyzer_end_to_end() {
    let before = "export interface Options { verbose?: boolean }\nexport function run(opts: Options) {}\n";
    let after = "export interface Options { verbose: boolean }\nexport function run(opts: Options) {}\n";
    let project = TestProject::with_files(&[
        ("lib.ts", after),
        ("cli.ts", "import { run, Options } from './lib';\n\nconst opts: Options = { verbose: true };\nrun(opts);\n"),
        ("runner.ts", "import { run } from './lib';\nrun({ verbose: false });\n"),
    ]);
    let analyzer = ChangeAnalyzer::new(ImpactConfig::preset(Preset::Thorough));
    let graph = analyzer.scanner().scan(project.root()).unwrap();
    let report = analyzer.analyze(&graph, &project.key("lib.ts"), before, after);

    assert!(report.is_breaking());
    assert_eq!(report.diff.impacted_names, names(&["Options"]));
    assert_affected(&report.impact, &[project.key("cli.ts")]);
    assert_eq!(
        report.impact.results[0].evidence,
        Evidence::known(2, EvidenceTier::Usage)
    );
}
