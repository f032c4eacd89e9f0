//! File-level snapshot model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::symbol::{SymbolInfo, SymbolKind};

/// Outcome of parsing the source a snapshot was built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseStatus {
    Clean,
    /// Tree contained ERROR/MISSING nodes; symbols are best-effort
    Degraded { error_nodes: usize },
    /// No tree was produced; the snapshot is empty
    Failed,
}

impl ParseStatus {
    pub fn is_clean(&self) -> bool {
        matches!(self, ParseStatus::Clean)
    }
}

/// How an export is exposed to consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Named,
    Default,
    Namespace,
}

/// What the exported name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredKind {
    Function,
    Class,
    Interface,
    Type,
    Enum,
    Variable,
    Namespace,
    Unknown,
}

impl From<SymbolKind> for DeclaredKind {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Function | SymbolKind::Method => DeclaredKind::Function,
            SymbolKind::Class => DeclaredKind::Class,
            SymbolKind::Interface => DeclaredKind::Interface,
            SymbolKind::Type => DeclaredKind::Type,
            SymbolKind::Enum => DeclaredKind::Enum,
        }
    }
}

/// Re-export origin (`export { a as b } from './m'`, `export * from './m'`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReexportInfo {
    /// Module specifier as written
    pub source_module: String,
    /// Name in the source module; `*` for star re-exports
    pub exported_name: String,
    /// Name exposed by this module
    pub local_name: String,
    pub is_type_only: bool,
}

/// One exported name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportInfo {
    /// Name consumers import; `default` for default exports, `*` for bare star re-exports
    pub name: String,
    pub kind: ExportKind,
    pub declared_kind: DeclaredKind,
    /// 1-based line
    pub line: u32,
    /// Local binding for `export { a as b }` without `from`
    pub local_name: Option<String>,
    pub reexport: Option<ReexportInfo>,
}

impl ExportInfo {
    /// Module specifier of a re-export, `None` for local exports
    pub fn source_module(&self) -> Option<&str> {
        self.reexport.as_ref().map(|r| r.source_module.as_str())
    }

    pub fn is_star(&self) -> bool {
        self.name == "*"
    }
}

/// Binding introduced by an import
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImportBinding {
    Default { local: String },
    Namespace { local: String },
    Named { imported: String, local: String },
}

impl ImportBinding {
    pub fn local(&self) -> &str {
        match self {
            ImportBinding::Default { local }
            | ImportBinding::Namespace { local }
            | ImportBinding::Named { local, .. } => local,
        }
    }
}

/// Syntactic form of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Static,
    SideEffect,
    Require,
    Dynamic,
}

/// One import of a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub module_specifier: String,
    /// 1-based line
    pub line: u32,
    pub bindings: Vec<ImportBinding>,
    pub is_type_only: bool,
    pub kind: ImportKind,
}

/// Immutable per-(file, content) record of declarations, exports and imports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    pub file_path: String,
    pub timestamp: DateTime<Utc>,
    /// blake3 hex digest of the source text
    pub content_hash: String,
    pub parse_status: ParseStatus,
    pub functions: Vec<SymbolInfo>,
    pub classes: Vec<SymbolInfo>,
    pub interfaces: Vec<SymbolInfo>,
    pub type_aliases: Vec<SymbolInfo>,
    pub enums: Vec<SymbolInfo>,
    pub exports: Vec<ExportInfo>,
    pub imports: Vec<ImportInfo>,
}

impl SymbolSnapshot {
    pub fn empty(
        file_path: impl Into<String>,
        content_hash: impl Into<String>,
        parse_status: ParseStatus,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            timestamp: Utc::now(),
            content_hash: content_hash.into(),
            parse_status,
            functions: Vec::new(),
            classes: Vec::new(),
            interfaces: Vec::new(),
            type_aliases: Vec::new(),
            enums: Vec::new(),
            exports: Vec::new(),
            imports: Vec::new(),
        }
    }

    /// All symbols in category order
    pub fn symbols(&self) -> impl Iterator<Item = &SymbolInfo> {
        self.functions
            .iter()
            .chain(self.classes.iter())
            .chain(self.interfaces.iter())
            .chain(self.type_aliases.iter())
            .chain(self.enums.iter())
    }

    pub fn symbol_count(&self) -> usize {
        self.functions.len()
            + self.classes.len()
            + self.interfaces.len()
            + self.type_aliases.len()
            + self.enums.len()
    }

    pub fn find_symbol(&self, name: &str) -> Option<&SymbolInfo> {
        self.symbols().find(|s| s.name == name)
    }

    /// Local export entry for `name`, ignoring re-exports
    pub fn local_export(&self, name: &str) -> Option<&ExportInfo> {
        self.exports
            .iter()
            .find(|e| e.reexport.is_none() && e.name == name)
    }

    /// Names under which a local symbol is exported (`export { a as b }` yields `b`)
    pub fn exported_names_of(&self, symbol: &str) -> Vec<String> {
        self.exports
            .iter()
            .filter(|e| e.reexport.is_none())
            .filter(|e| e.local_name.as_deref().unwrap_or(e.name.as_str()) == symbol)
            .map(|e| e.name.clone())
            .collect()
    }
}
