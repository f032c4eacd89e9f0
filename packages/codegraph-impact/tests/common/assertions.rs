//! Custom assertions for diff and impact results

use codegraph_impact::features::snapshot_diff::{ChangeType, RuleId, SymbolChange};
use codegraph_impact::{CanonicalPath, ImpactResolution, SnapshotDiff};

/// Assert exactly one symbol change and return it
pub fn assert_single_change(diff: &SnapshotDiff) -> &SymbolChange {
    assert_eq!(
        diff.changed_symbols.len(),
        1,
        "Expected exactly one change, got: {:?}",
        diff.changed_symbols
            .iter()
            .map(|c| (&c.symbol, c.change_type, c.rule_id))
            .collect::<Vec<_>>()
    );
    &diff.changed_symbols[0]
}

/// Assert exactly one change with the given type and rule
pub fn assert_single_change_of(
    diff: &SnapshotDiff,
    change_type: ChangeType,
    rule: RuleId,
) -> &SymbolChange {
    let change = assert_single_change(diff);
    assert_eq!(change.change_type, change_type, "change type of {}", change.symbol);
    assert_eq!(change.rule_id, rule, "rule of {}", change.symbol);
    change
}

/// Assert the diff carries neither symbol nor export changes
pub fn assert_no_changes(diff: &SnapshotDiff) {
    assert!(
        diff.changed_symbols.is_empty(),
        "Expected no changes, got: {:?}",
        diff.changed_symbols
    );
    assert!(
        diff.export_changes.is_empty(),
        "Expected no export changes, got: {:?}",
        diff.export_changes
    );
}

/// Assert the affected files equal `expected`, in order
pub fn assert_affected(resolution: &ImpactResolution, expected: &[CanonicalPath]) {
    let actual: Vec<&CanonicalPath> = resolution.files().collect();
    let expected: Vec<&CanonicalPath> = expected.iter().collect();
    assert_eq!(actual, expected, "affected files");
}
