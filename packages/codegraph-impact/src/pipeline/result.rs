//! Change analysis result

use serde::{Deserialize, Serialize};

use crate::features::impact::ImpactResolution;
use crate::features::snapshot_diff::{Severity, SnapshotDiff};

/// Diff of one file plus the files it affects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub diff: SnapshotDiff,
    pub impact: ImpactResolution,
}

impl ChangeReport {
    pub fn is_breaking(&self) -> bool {
        self.diff.has_breaking_changes()
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.diff.max_severity()
    }

    /// One-line summary for logs and terminals
    pub fn summary(&self) -> String {
        format!(
            "{}: {} change(s), {} export change(s), breaking={}, {} affected file(s){}",
            self.diff.file_path,
            self.diff.changed_symbols.len(),
            self.diff.export_changes.added.len()
                + self.diff.export_changes.removed.len()
                + self.diff.export_changes.modified.len(),
            self.is_breaking(),
            self.impact.results.len(),
            if self.impact.is_incomplete() { " (incomplete)" } else { "" }
        )
    }
}
