//! Test fixtures
//!
//! `TestProject` materializes a TypeScript project in a temporary directory.

use std::fs;
use std::path::Path;

use codegraph_impact::{
    CanonicalPath, ProjectGraph, ProjectScanner, SnapshotBuilder, SnapshotDiff, SnapshotDiffer,
    SymbolSnapshot,
};
use tempfile::TempDir;

/// Temporary project root with helpers for writing files and scanning
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Project with the given `(relative path, content)` files
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let project = Self::new();
        for (rel, content) in files {
            project.write(rel, content);
        }
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, content).expect("write fixture file");
    }

    /// Graph key of a project file
    pub fn key(&self, rel: &str) -> CanonicalPath {
        CanonicalPath::new(self.dir.path().join(rel))
    }

    pub fn scan(&self) -> ProjectGraph {
        ProjectScanner::default()
            .scan(self.dir.path())
            .expect("scan project")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

pub fn snapshot(source: &str) -> SymbolSnapshot {
    SnapshotBuilder::new().build("src/module.ts", source)
}

/// Diff two versions of `src/module.ts`
pub fn diff_sources(before: &str, after: &str) -> SnapshotDiff {
    let builder = SnapshotBuilder::new();
    let before = builder.build("src/module.ts", before);
    let after = builder.build("src/module.ts", after);
    SnapshotDiffer::new().diff(&before, &after)
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Module exporting `count` functions, interfaces and type aliases
pub fn fixture_module(count: usize) -> String {
    let mut out = String::from("import { helper } from './helper';\n\n");
    for i in 0..count {
        out.push_str(&format!(
            "export function handler_{i}(input: string, retries?: number): Promise<void> {{ return helper(input); }}\n"
        ));
        out.push_str(&format!(
            "export interface Options{i} {{ name: string; limit?: number; run(arg: string): void }}\n"
        ));
        out.push_str(&format!("export type Id{i} = string | number;\n"));
    }
    out
}
