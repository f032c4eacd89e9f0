//! Change analysis orchestrator
//!
//! Snapshot before and after, diff them, then resolve downstream impact of the
//! impacted export names against a project graph.

use tracing::{debug, info};

use super::result::ChangeReport;
use crate::config::ImpactConfig;
use crate::features::cross_file::{ProjectGraph, ProjectScanner};
use crate::features::impact::{DownstreamResolver, ImpactResolution};
use crate::features::snapshot::SnapshotBuilder;
use crate::features::snapshot_diff::{SnapshotDiff, SnapshotDiffer};
use crate::shared::models::CanonicalPath;

/// Configured diff + impact pipeline
#[derive(Debug, Clone)]
pub struct ChangeAnalyzer {
    config: ImpactConfig,
    builder: SnapshotBuilder,
    differ: SnapshotDiffer,
    resolver: DownstreamResolver,
}

impl ChangeAnalyzer {
    pub fn new(config: ImpactConfig) -> Self {
        Self {
            builder: SnapshotBuilder::new(),
            differ: SnapshotDiffer::with_config(&config.diff),
            resolver: DownstreamResolver::new(config.impact.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ImpactConfig {
        &self.config
    }

    /// Scanner configured from the `scan` and `resolver` sections
    pub fn scanner(&self) -> ProjectScanner {
        ProjectScanner::new(self.config.scan.clone(), self.config.resolver.clone())
    }

    pub fn diff(&self, file_path: &str, before: &str, after: &str) -> SnapshotDiff {
        let before = self.builder.build(file_path, before);
        let after = self.builder.build(file_path, after);
        self.differ.diff(&before, &after)
    }

    /// Downstream impact with an optional name filter
    pub fn impact(
        &self,
        graph: &ProjectGraph,
        file: &CanonicalPath,
        names: Option<&[String]>,
    ) -> ImpactResolution {
        self.resolver.resolve(graph, file, names)
    }

    /// Diff, then resolve impact of the names consumers observe changing
    pub fn analyze(
        &self,
        graph: &ProjectGraph,
        file: &CanonicalPath,
        before: &str,
        after: &str,
    ) -> ChangeReport {
        let diff = self.diff(file.as_str(), before, after);
        let impact = if diff.is_empty() {
            debug!(file = %file, "no structural change");
            ImpactResolution::not_attempted(file.clone(), "no structural change")
        } else {
            self.resolver.resolve(graph, file, Some(&diff.impacted_names))
        };
        let report = ChangeReport { diff, impact };
        info!(summary = %report.summary(), "change analyzed");
        report
    }
}

impl Default for ChangeAnalyzer {
    fn default() -> Self {
        Self::new(ImpactConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::impact::{EvidenceTier, ResolutionStatus};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_analyze_end_to_end() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let before = "export function greet(name: string): string { return name; }\n";
        let after = "export function greet(name: string, loud: boolean): string { return name; }\n";
        fs::write(root.join("greet.ts"), before).unwrap();
        fs::write(root.join("app.ts"), "import { greet } from './greet';\n\ngreet('x');\n").unwrap();
        fs::write(root.join("other.ts"), "import './greet';\n").unwrap();

        let analyzer = ChangeAnalyzer::default();
        let graph = analyzer.scanner().scan(root).unwrap();
        let file = CanonicalPath::new(root.join("greet.ts"));
        let report = analyzer.analyze(&graph, &file, before, after);

        assert!(report.is_breaking());
        assert_eq!(report.diff.impacted_names, vec!["greet".to_string()]);
        assert_eq!(report.impact.status, ResolutionStatus::Resolved);
        assert_eq!(report.impact.results.len(), 1);
        assert_eq!(report.impact.results[0].evidence.tier, EvidenceTier::Usage);
    }

    #[test]
    fn test_no_change_skips_impact() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.ts"), "export const a = 1;").unwrap();
        let analyzer = ChangeAnalyzer::default();
        let graph = analyzer.scanner().scan(dir.path()).unwrap();
        let file = CanonicalPath::new(dir.path().join("a.ts"));
        let report = analyzer.analyze(&graph, &file, "export const a = 1;", "export const a = 1;");
        assert!(!report.impact.is_resolved());
    }
}
