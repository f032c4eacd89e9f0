//! Snapshot differ
//!
//! Compares two snapshots of the same file category by category. Symbols are
//! matched by qualified name; the first declaration of a name wins.
//!
//! ═══════════════════════════════════════════════════════════════════════════
//! ORDERING
//! ═══════════════════════════════════════════════════════════════════════════
//!
//! Within each category (functions, classes, interfaces, type aliases, enums):
//! removals in "before" order, additions in "after" order, then modifications
//! in "after" order. The result is deterministic for identical inputs.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::export_diff::diff_exports;
use super::rename::rename_hints;
use super::rules::classify_modification;
use crate::config::DiffConfig;
use crate::features::snapshot::domain::{SymbolInfo, SymbolSnapshot};
use crate::features::snapshot_diff::domain::{
    ChangeType, RuleId, Severity, SnapshotDiff, SymbolChange,
};

/// Structural differ between two snapshots of one file
#[derive(Debug, Clone, Default)]
pub struct SnapshotDiffer {
    config: DiffConfig,
}

impl SnapshotDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &DiffConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn diff(&self, before: &SymbolSnapshot, after: &SymbolSnapshot) -> SnapshotDiff {
        let mut diff = SnapshotDiff {
            file_path: after.file_path.clone(),
            export_changes: diff_exports(&before.exports, &after.exports),
            ..SnapshotDiff::default()
        };

        let categories = [
            (&before.functions, &after.functions),
            (&before.classes, &after.classes),
            (&before.interfaces, &after.interfaces),
            (&before.type_aliases, &after.type_aliases),
            (&before.enums, &after.enums),
        ];

        let mut removed_symbols = Vec::new();
        let mut added_symbols = Vec::new();

        for (old, new) in categories {
            let old_by_name = index_by_name(old);
            let new_by_name = index_by_name(new);

            for symbol in unique(old) {
                if !new_by_name.contains_key(symbol.qualified_name.as_str()) {
                    diff.removed.push(symbol.kind, &symbol.name);
                    diff.changed_symbols.push(removal(symbol));
                    removed_symbols.push(symbol);
                }
            }
            for symbol in unique(new) {
                if !old_by_name.contains_key(symbol.qualified_name.as_str()) {
                    diff.added.push(symbol.kind, &symbol.name);
                    diff.changed_symbols.push(addition(symbol));
                    added_symbols.push(symbol);
                }
            }
            for symbol in unique(new) {
                let Some(prev) = old_by_name.get(symbol.qualified_name.as_str()) else {
                    continue;
                };
                if prev.same_structure(symbol) {
                    continue;
                }
                diff.modified.push(symbol.kind, &symbol.name);
                diff.changed_symbols.push(modification(prev, symbol));
            }
        }

        diff.impacted_names = impacted_names(before, after, &diff);

        if self.config.rename_hints {
            diff.rename_hints = rename_hints(
                &removed_symbols,
                &added_symbols,
                self.config.rename_min_similarity,
            );
        }

        debug!(
            file = %diff.file_path,
            added = diff.added.len(),
            removed = diff.removed.len(),
            modified = diff.modified.len(),
            exports_removed = diff.export_changes.removed.len(),
            "snapshot diff computed"
        );

        diff
    }
}

fn index_by_name(symbols: &[SymbolInfo]) -> HashMap<&str, &SymbolInfo> {
    let mut map = HashMap::with_capacity(symbols.len());
    for symbol in symbols {
        map.entry(symbol.qualified_name.as_str()).or_insert(symbol);
    }
    map
}

/// Declaration order with later duplicates of a name skipped
fn unique(symbols: &[SymbolInfo]) -> impl Iterator<Item = &SymbolInfo> {
    let mut seen = BTreeSet::new();
    symbols
        .iter()
        .filter(move |s| seen.insert(s.qualified_name.as_str()))
}

fn removal(symbol: &SymbolInfo) -> SymbolChange {
    SymbolChange {
        symbol: symbol.qualified_name.clone(),
        kind: symbol.kind,
        change_type: ChangeType::Removed,
        before: Some(symbol.clone()),
        after: None,
        severity: Severity::classify(ChangeType::Removed, symbol.is_exported),
        is_breaking: symbol.is_exported,
        rule_id: RuleId::SymbolRemoved,
        message: format!("{} '{}' removed", symbol.kind, symbol.name),
    }
}

fn addition(symbol: &SymbolInfo) -> SymbolChange {
    SymbolChange {
        symbol: symbol.qualified_name.clone(),
        kind: symbol.kind,
        change_type: ChangeType::Added,
        before: None,
        after: Some(symbol.clone()),
        severity: Severity::classify(ChangeType::Added, symbol.is_exported),
        is_breaking: false,
        rule_id: RuleId::SymbolAdded,
        message: format!("{} '{}' added", symbol.kind, symbol.name),
    }
}

fn modification(before: &SymbolInfo, after: &SymbolInfo) -> SymbolChange {
    let matched = classify_modification(before, after);
    SymbolChange {
        symbol: after.qualified_name.clone(),
        kind: after.kind,
        change_type: matched.change_type,
        before: Some(before.clone()),
        after: Some(after.clone()),
        severity: Severity::classify(matched.change_type, before.is_exported),
        is_breaking: before.is_exported,
        rule_id: matched.rule_id,
        message: matched.message,
    }
}

/// Export names whose consumers observe this diff
fn impacted_names(before: &SymbolSnapshot, after: &SymbolSnapshot, diff: &SnapshotDiff) -> Vec<String> {
    let mut names = BTreeSet::new();
    for change in &diff.changed_symbols {
        if change.change_type == ChangeType::Added {
            continue;
        }
        names.extend(before.exported_names_of(&change.symbol));
        names.extend(after.exported_names_of(&change.symbol));
    }
    names.extend(diff.export_changes.removed.iter().map(|e| e.name.clone()));
    names.extend(diff.export_changes.modified.iter().map(|m| m.before.name.clone()));
    names.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::snapshot::SnapshotBuilder;
    use crate::features::snapshot::domain::SymbolKind;

    fn diff(before: &str, after: &str) -> SnapshotDiff {
        let builder = SnapshotBuilder::new();
        let a = builder.build("/p/a.ts", before);
        let b = builder.build("/p/a.ts", after);
        SnapshotDiffer::new().diff(&a, &b)
    }

    #[test]
    fn test_identical_is_empty() {
        let code = "export function f(a: string): number { return 1; }\nexport interface I { x: number }";
        let d = diff(code, code);
        assert!(d.is_empty());
        assert!(d.impacted_names.is_empty());
    }

    #[test]
    fn test_body_only_change_is_empty() {
        let d = diff(
            "export function f(a: string) { return 1; }",
            "export function f(a: string) { return 2 + 3; }",
        );
        assert!(d.is_empty());
    }

    #[test]
    fn test_dropped_export_keyword() {
        let d = diff("export function f() {}", "function f() {}");
        assert!(d.changed_symbols.is_empty());
        assert_eq!(d.export_changes.removed.len(), 1);
        assert_eq!(d.impacted_names, vec!["f".to_string()]);
        assert!(d.has_breaking_changes());
    }

    #[test]
    fn test_optional_to_required() {
        let d = diff(
            "export function f(a: string, b?: number) {}",
            "export function f(a: string, b: number) {}",
        );
        assert_eq!(d.changed_symbols.len(), 1);
        let change = &d.changed_symbols[0];
        assert_eq!(change.change_type, ChangeType::SignatureChanged);
        assert_eq!(change.rule_id, RuleId::ParamRequired);
        assert_eq!(change.severity, Severity::High);
        assert!(change.is_breaking);
        assert_eq!(d.modified.functions, vec!["f".to_string()]);
    }

    #[test]
    fn test_removed_private_symbol_is_info() {
        let d = diff("function helper() {}\nexport function f() {}", "export function f() {}");
        assert_eq!(d.changed_symbols.len(), 1);
        assert_eq!(d.changed_symbols[0].severity, Severity::Info);
        assert!(!d.changed_symbols[0].is_breaking);
        assert!(!d.has_breaking_changes());
    }

    #[test]
    fn test_ordering_removed_added_modified() {
        let d = diff(
            "export function a() {}\nexport function b(x: string) {}",
            "export function b(x: number) {}\nexport function c() {}",
        );
        let kinds: Vec<ChangeType> = d.changed_symbols.iter().map(|c| c.change_type).collect();
        assert_eq!(
            kinds,
            vec![ChangeType::Removed, ChangeType::Added, ChangeType::TypeChanged]
        );
    }

    #[test]
    fn test_aliased_export_reports_public_name() {
        let d = diff(
            "function impl(a: string) {}\nexport { impl as run };",
            "function impl(a: number) {}\nexport { impl as run };",
        );
        assert_eq!(d.impacted_names, vec!["run".to_string()]);
    }

    #[test]
    fn test_rename_hint() {
        let d = diff(
            "export function loadUser(id: string): User { return x; }",
            "export function fetchUser(id: string): User { return x; }",
        );
        assert_eq!(d.rename_hints.len(), 1);
        assert_eq!(d.rename_hints[0].kind, SymbolKind::Function);
    }

    #[test]
    fn test_rename_hints_disabled() {
        let config = DiffConfig {
            rename_hints: false,
            ..DiffConfig::default()
        };
        let builder = SnapshotBuilder::new();
        let a = builder.build("/p/a.ts", "export function loadUser() {}");
        let b = builder.build("/p/a.ts", "export function fetchUser() {}");
        let d = SnapshotDiffer::with_config(&config).diff(&a, &b);
        assert!(d.rename_hints.is_empty());
    }
}
