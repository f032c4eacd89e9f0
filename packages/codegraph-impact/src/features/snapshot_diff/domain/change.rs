//! Snapshot diff result types

use serde::{Deserialize, Serialize};

use crate::features::snapshot::domain::{ExportInfo, SymbolInfo, SymbolKind};

/// Severity of a symbol change for consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Exported symbol removed
    Critical,
    /// Exported symbol's call shape changed
    High,
    /// Exported symbol's types changed
    Medium,
    /// Exported symbol added
    Low,
    /// Non-exported symbol changed
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    pub fn classify(change_type: ChangeType, is_exported: bool) -> Self {
        if !is_exported {
            return Severity::Info;
        }
        match change_type {
            ChangeType::Removed => Severity::Critical,
            ChangeType::SignatureChanged => Severity::High,
            ChangeType::TypeChanged => Severity::Medium,
            ChangeType::Added => Severity::Low,
        }
    }
}

/// Kind of change applied to a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    Added,
    Removed,
    SignatureChanged,
    TypeChanged,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
            ChangeType::SignatureChanged => "signature-changed",
            ChangeType::TypeChanged => "type-changed",
        }
    }
}

/// Identifier of the rule that classified a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    SymbolAdded,
    SymbolRemoved,
    OverloadSet,
    ParamCount,
    ParamRemoved,
    ParamRequired,
    ParamType,
    ReturnType,
    CallSignature,
    IndexSignatureRemoved,
    IndexSignature,
    PropertyRemoved,
    PropertyRequired,
    PropertyType,
    MethodSignature,
    ClassMethodRemoved,
    ClassMethodParams,
    ClassMethodReturn,
    SignatureText,
    ReturnText,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::SymbolAdded => "symbol-added",
            RuleId::SymbolRemoved => "symbol-removed",
            RuleId::OverloadSet => "overload-set",
            RuleId::ParamCount => "param-count",
            RuleId::ParamRemoved => "param-removed",
            RuleId::ParamRequired => "param-required",
            RuleId::ParamType => "param-type",
            RuleId::ReturnType => "return-type",
            RuleId::CallSignature => "call-signature",
            RuleId::IndexSignatureRemoved => "index-signature-removed",
            RuleId::IndexSignature => "index-signature",
            RuleId::PropertyRemoved => "property-removed",
            RuleId::PropertyRequired => "property-required",
            RuleId::PropertyType => "property-type",
            RuleId::MethodSignature => "method-signature",
            RuleId::ClassMethodRemoved => "class-method-removed",
            RuleId::ClassMethodParams => "class-method-params",
            RuleId::ClassMethodReturn => "class-method-return",
            RuleId::SignatureText => "signature-text",
            RuleId::ReturnText => "return-text",
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified symbol change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolChange {
    /// Qualified symbol name
    pub symbol: String,
    pub kind: SymbolKind,
    pub change_type: ChangeType,
    pub before: Option<SymbolInfo>,
    pub after: Option<SymbolInfo>,
    pub severity: Severity,
    pub is_breaking: bool,
    pub rule_id: RuleId,
    pub message: String,
}

/// Symbol names grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedSymbols {
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub interfaces: Vec<String>,
    pub type_aliases: Vec<String>,
    pub enums: Vec<String>,
}

impl CategorizedSymbols {
    pub fn push(&mut self, kind: SymbolKind, name: impl Into<String>) {
        let list = match kind {
            SymbolKind::Function | SymbolKind::Method => &mut self.functions,
            SymbolKind::Class => &mut self.classes,
            SymbolKind::Interface => &mut self.interfaces,
            SymbolKind::Type => &mut self.type_aliases,
            SymbolKind::Enum => &mut self.enums,
        };
        list.push(name.into());
    }

    pub fn len(&self) -> usize {
        self.functions.len()
            + self.classes.len()
            + self.interfaces.len()
            + self.type_aliases.len()
            + self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Same export key, different content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportModification {
    pub before: ExportInfo,
    pub after: ExportInfo,
}

/// Export surface delta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportChanges {
    pub added: Vec<ExportInfo>,
    pub removed: Vec<ExportInfo>,
    pub modified: Vec<ExportModification>,
}

impl ExportChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Trust level of a rename hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintConfidence {
    Low,
}

/// Removed/added pair with near-identical shape. Never applied automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameHint {
    pub kind: SymbolKind,
    pub from: String,
    pub to: String,
    pub similarity: f64,
    pub confidence: HintConfidence,
}

/// Structural diff of two snapshots of one file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDiff {
    pub file_path: String,
    pub changed_symbols: Vec<SymbolChange>,
    pub added: CategorizedSymbols,
    pub removed: CategorizedSymbols,
    pub modified: CategorizedSymbols,
    pub export_changes: ExportChanges,
    /// Export names under which consumers observe a change, sorted
    pub impacted_names: Vec<String>,
    pub rename_hints: Vec<RenameHint>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.changed_symbols.is_empty() && self.export_changes.is_empty()
    }

    pub fn has_breaking_changes(&self) -> bool {
        self.changed_symbols.iter().any(|c| c.is_breaking)
            || !self.export_changes.removed.is_empty()
            || !self.export_changes.modified.is_empty()
    }

    pub fn breaking_changes(&self) -> impl Iterator<Item = &SymbolChange> {
        self.changed_symbols.iter().filter(|c| c.is_breaking)
    }

    /// Changes with symbol removals that the export diff already reports suppressed
    pub fn consolidated_changes(&self) -> Vec<&SymbolChange> {
        self.changed_symbols
            .iter()
            .filter(|change| {
                change.change_type != ChangeType::Removed
                    || !self.export_changes.removed.iter().any(|e| {
                        e.name == change.symbol
                            || e.local_name.as_deref() == Some(change.symbol.as_str())
                    })
            })
            .collect()
    }

    /// Highest severity present
    pub fn max_severity(&self) -> Option<Severity> {
        self.changed_symbols.iter().map(|c| c.severity).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::snapshot::domain::{DeclaredKind, ExportKind};

    #[test]
    fn test_severity_classification() {
        assert_eq!(Severity::classify(ChangeType::Removed, true), Severity::Critical);
        assert_eq!(Severity::classify(ChangeType::SignatureChanged, true), Severity::High);
        assert_eq!(Severity::classify(ChangeType::TypeChanged, true), Severity::Medium);
        assert_eq!(Severity::classify(ChangeType::Added, true), Severity::Low);
        assert_eq!(Severity::classify(ChangeType::Removed, false), Severity::Info);
    }

    #[test]
    fn test_rule_id_serde_matches_as_str() {
        for rule in [RuleId::IndexSignatureRemoved, RuleId::ClassMethodParams, RuleId::ReturnText] {
            let json = serde_json::to_string(&rule).unwrap();
            assert_eq!(json, format!("\"{}\"", rule.as_str()));
        }
        let json = serde_json::to_string(&ChangeType::SignatureChanged).unwrap();
        assert_eq!(json, "\"signature-changed\"");
    }

    #[test]
    fn test_consolidated_changes_suppresses_export_removals() {
        let removed = SymbolChange {
            symbol: "gone".to_string(),
            kind: SymbolKind::Function,
            change_type: ChangeType::Removed,
            before: None,
            after: None,
            severity: Severity::Critical,
            is_breaking: true,
            rule_id: RuleId::SymbolRemoved,
            message: String::new(),
        };
        let mut diff = SnapshotDiff {
            changed_symbols: vec![removed],
            ..SnapshotDiff::default()
        };
        assert_eq!(diff.consolidated_changes().len(), 1);

        diff.export_changes.removed.push(ExportInfo {
            name: "gone".to_string(),
            kind: ExportKind::Named,
            declared_kind: DeclaredKind::Function,
            line: 1,
            local_name: None,
            reexport: None,
        });
        assert!(diff.consolidated_changes().is_empty());
        assert_eq!(diff.max_severity(), Some(Severity::Critical));
    }
}
