//! Cross-file types
//!
//! Records produced while scanning a project: module references found in a
//! file, their resolved targets, and per-module export records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::features::snapshot::domain::{ImportBinding, ImportKind};
use crate::shared::models::CanonicalPath;

/// Which extraction strategy produced a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionTier {
    /// Syntax tree
    Structural,
    /// Regex over raw text
    Textual,
}

/// Syntactic form of a module reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Import,
    Reexport,
    Require,
    DynamicImport,
}

/// A module specifier as written in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleReference {
    pub specifier: String,
    /// 0-based line of the statement
    pub line: u32,
    pub kind: ReferenceKind,
    pub tier: ExtractionTier,
}

/// Import of a resolved module, kept for usage scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedImport {
    pub target: CanonicalPath,
    /// 0-based line
    pub line: u32,
    pub bindings: Vec<ImportBinding>,
    pub kind: ImportKind,
    pub is_type_only: bool,
}

/// Where an exported name comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum ExportTarget {
    /// Declared (or imported and re-exposed) in the module itself
    Local { local_name: String },
    /// `export { a as b } from './m'`; `source_name` is `*` for `export * as ns`
    Reexport {
        source: CanonicalPath,
        source_name: String,
    },
}

/// One exported name of a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub name: String,
    pub target: ExportTarget,
    pub is_type_only: bool,
    /// 0-based line
    pub line: u32,
}

/// Export surface of a single module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleExports {
    pub named: BTreeMap<String, ExportRecord>,
    /// Modules re-exported wholesale with `export * from`
    pub star_sources: Vec<CanonicalPath>,
}

impl ModuleExports {
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.star_sources.is_empty()
    }
}

/// Counters for a project scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub files_discovered: usize,
    pub files_scanned: usize,
    /// Unreadable files
    pub files_skipped: usize,
    /// Files never scheduled because the time budget ran out
    pub files_unscheduled: usize,
    pub files_degraded: usize,
    /// Files whose references came from the regex fallback
    pub files_textual: usize,
    pub specifiers_resolved: usize,
    pub specifiers_unresolved: usize,
    pub timed_out: bool,
    pub duration_ms: u64,
}
