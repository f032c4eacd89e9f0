//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Editor/CI feedback loop
    ///
    /// - Scan: 5s budget
    /// - Impact: structural evidence only, depth 3
    /// - Diff: no rename hints
    Fast,

    /// Default interactive use
    ///
    /// - Scan: 30s budget
    /// - Impact: text fallback on, depth 8
    /// - Diff: rename hints at 0.8 similarity
    Balanced,

    /// Release review
    ///
    /// - Scan: no budget
    /// - Impact: text fallback on, depth 32
    /// - Diff: rename hints at 0.6 similarity
    Thorough,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
