//! Downstream impact result types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::models::CanonicalPath;

/// Source line backing a result, or explicitly none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceLine {
    /// 0-based line
    Known(u32),
    Unknown,
}

impl EvidenceLine {
    pub fn line(&self) -> Option<u32> {
        match self {
            EvidenceLine::Known(line) => Some(*line),
            EvidenceLine::Unknown => None,
        }
    }
}

impl fmt::Display for EvidenceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceLine::Known(line) => write!(f, "{}", line + 1),
            EvidenceLine::Unknown => f.write_str("?"),
        }
    }
}

/// Strategy that produced the evidence, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceTier {
    /// First structural usage of the (alias-resolved) name
    Usage,
    /// First textual occurrence outside import statements
    TextMatch,
    /// The statement importing the changed file
    ImportStatement,
    Unknown,
}

impl EvidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceTier::Usage => "usage",
            EvidenceTier::TextMatch => "text_match",
            EvidenceTier::ImportStatement => "import_statement",
            EvidenceTier::Unknown => "unknown",
        }
    }

    /// Heuristic tiers may be discounted by consumers
    pub fn is_heuristic(&self) -> bool {
        matches!(self, EvidenceTier::TextMatch | EvidenceTier::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evidence {
    pub line: EvidenceLine,
    pub tier: EvidenceTier,
}

impl Evidence {
    pub fn known(line: u32, tier: EvidenceTier) -> Self {
        Self {
            line: EvidenceLine::Known(line),
            tier,
        }
    }

    pub fn unknown() -> Self {
        Self {
            line: EvidenceLine::Unknown,
            tier: EvidenceTier::Unknown,
        }
    }
}

/// How a file relates to the changed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    DirectImporter,
    Reexporter,
    Transitive,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::DirectImporter => "direct_importer",
            Relation::Reexporter => "reexporter",
            Relation::Transitive => "transitive",
        }
    }
}

/// One affected file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownstreamResult {
    pub file_path: CanonicalPath,
    pub evidence: Evidence,
    pub relation: Relation,
    /// Import hops from the changed file
    pub depth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// Resolution ran; the result list may be empty
    Resolved,
    NotAttempted { reason: String },
}

/// Outcome of one downstream resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactResolution {
    pub changed_file: CanonicalPath,
    pub status: ResolutionStatus,
    pub results: Vec<DownstreamResult>,
    /// The graph came from a scan that ran out of time
    pub partial_graph: bool,
    /// Propagation stopped at the configured depth cap with importers left unvisited
    pub truncated: bool,
}

impl ImpactResolution {
    pub fn not_attempted(changed_file: CanonicalPath, reason: impl Into<String>) -> Self {
        Self {
            changed_file,
            status: ResolutionStatus::NotAttempted {
                reason: reason.into(),
            },
            results: Vec::new(),
            partial_graph: false,
            truncated: false,
        }
    }

    /// Results may be missing files: the graph was partial or propagation was cut short
    pub fn is_incomplete(&self) -> bool {
        self.partial_graph || self.truncated
    }

    pub fn is_resolved(&self) -> bool {
        self.status == ResolutionStatus::Resolved
    }

    pub fn files(&self) -> impl Iterator<Item = &CanonicalPath> {
        self.results.iter().map(|r| &r.file_path)
    }

    pub fn get(&self, file: &CanonicalPath) -> Option<&DownstreamResult> {
        self.results.iter().find(|r| &r.file_path == file)
    }
}
