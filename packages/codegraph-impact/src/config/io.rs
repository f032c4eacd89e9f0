//! Configuration I/O (YAML schema)

use serde::{Deserialize, Serialize};

use super::patch::*;

/// YAML Schema v1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    /// Base preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan: Option<ScanConfigPatch>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<ResolverConfigPatch>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<PropagationConfigPatch>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffConfigPatch>,
}

/// Schema versions this build reads
pub const SUPPORTED_VERSIONS: &[u32] = &[1];
