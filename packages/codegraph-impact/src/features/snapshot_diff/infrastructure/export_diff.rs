//! Export surface comparison
//!
//! Exports are keyed by `(name, source_module)`. A re-export that only moved
//! to another source module is reported as modified rather than as a
//! removal plus an addition.

use std::collections::HashMap;

use crate::features::snapshot::domain::ExportInfo;
use crate::features::snapshot_diff::domain::{ExportChanges, ExportModification};

type ExportKey = (String, Option<String>);

fn key_of(export: &ExportInfo) -> ExportKey {
    (export.name.clone(), export.source_module().map(str::to_string))
}

/// Same key, different observable content. Line moves don't count.
fn differs(before: &ExportInfo, after: &ExportInfo) -> bool {
    before.kind != after.kind
        || before.declared_kind != after.declared_kind
        || before.local_name != after.local_name
        || before.reexport.as_ref().map(|r| (&r.exported_name, r.is_type_only))
            != after.reexport.as_ref().map(|r| (&r.exported_name, r.is_type_only))
}

pub fn diff_exports(before: &[ExportInfo], after: &[ExportInfo]) -> ExportChanges {
    let before_keys: HashMap<ExportKey, &ExportInfo> =
        before.iter().map(|e| (key_of(e), e)).collect();
    let after_keys: HashMap<ExportKey, &ExportInfo> =
        after.iter().map(|e| (key_of(e), e)).collect();

    let mut changes = ExportChanges::default();

    for export in before {
        if !after_keys.contains_key(&key_of(export)) {
            changes.removed.push(export.clone());
        }
    }
    for export in after {
        match before_keys.get(&key_of(export)) {
            None => changes.added.push(export.clone()),
            Some(prev) if differs(prev, export) => changes.modified.push(ExportModification {
                before: (*prev).clone(),
                after: export.clone(),
            }),
            Some(_) => {}
        }
    }

    pair_moved_reexports(&mut changes);
    changes
}

/// Pair a removed and an added re-export of the same name into `modified`
fn pair_moved_reexports(changes: &mut ExportChanges) {
    let mut remaining_removed = Vec::with_capacity(changes.removed.len());
    for removed in std::mem::take(&mut changes.removed) {
        let partner = removed.reexport.as_ref().and_then(|_| {
            changes
                .added
                .iter()
                .position(|added| added.reexport.is_some() && added.name == removed.name)
        });
        match partner {
            Some(index) => {
                let added = changes.added.remove(index);
                changes.modified.push(ExportModification {
                    before: removed,
                    after: added,
                });
            }
            None => remaining_removed.push(removed),
        }
    }
    changes.removed = remaining_removed;
}
