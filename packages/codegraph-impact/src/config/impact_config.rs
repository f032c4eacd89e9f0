//! Top-level configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigFileV1, SUPPORTED_VERSIONS};
use super::patch::*;
use super::preset::Preset;
use super::stage_configs::*;
use super::validation::Validatable;

pub const ENV_PRESET: &str = "CODEGRAPH_IMPACT_PRESET";
pub const ENV_TIME_BUDGET_MS: &str = "CODEGRAPH_IMPACT_TIME_BUDGET_MS";
pub const ENV_WORKERS: &str = "CODEGRAPH_IMPACT_WORKERS";

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactConfig {
    pub version: u32,
    pub preset: Preset,
    pub scan: ScanConfig,
    pub resolver: ResolverConfig,
    pub impact: PropagationConfig,
    pub diff: DiffConfig,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl ImpactConfig {
    /// Defaults for a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            version: 1,
            preset,
            scan: ScanConfig::for_preset(preset),
            resolver: ResolverConfig::default(),
            impact: PropagationConfig::for_preset(preset),
            diff: DiffConfig::for_preset(preset),
        }
    }

    /// Load from a YAML file (v1 schema), then apply environment overrides
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loading configuration");
        Self::from_yaml_str_with_env(&content, |key| std::env::var(key).ok())
    }

    /// Parse YAML text (v1 schema), then apply environment overrides
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        Self::from_yaml_str_with_env(content, |key| std::env::var(key).ok())
    }

    /// Parse YAML text with an explicit environment lookup
    pub fn from_yaml_str_with_env<F>(content: &str, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        // Environment preset wins over the file's preset
        let preset = match env(ENV_PRESET).or(file.preset) {
            Some(name) => name.parse::<Preset>()?,
            None => Preset::default(),
        };

        let mut config = Self::preset(preset);
        if let Some(patch) = file.scan {
            patch.apply(&mut config.scan);
        }
        if let Some(patch) = file.resolver {
            patch.apply(&mut config.resolver);
        }
        if let Some(patch) = file.impact {
            patch.apply(&mut config.impact);
        }
        if let Some(patch) = file.diff {
            patch.apply(&mut config.diff);
        }

        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Preset defaults with environment overrides
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// [`ImpactConfig::from_env`] with an explicit environment lookup
    pub fn from_env_with<F>(env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let preset = match env(ENV_PRESET) {
            Some(name) => name.parse::<Preset>()?,
            None => Preset::default(),
        };
        let mut config = Self::preset(preset);
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `CODEGRAPH_IMPACT_TIME_BUDGET_MS` and `CODEGRAPH_IMPACT_WORKERS`
    pub fn apply_env_overrides<F>(&mut self, env: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = env(ENV_TIME_BUDGET_MS) {
            let ms: u64 = raw.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("{} must be an integer, got '{}'", ENV_TIME_BUDGET_MS, raw))
            })?;
            self.scan.time_budget_ms = (ms > 0).then_some(ms);
        }
        if let Some(raw) = env(ENV_WORKERS) {
            self.scan.parallel_workers = raw.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("{} must be an integer, got '{}'", ENV_WORKERS, raw))
            })?;
        }
        Ok(())
    }

    /// Validate every section
    pub fn validate(&self) -> ConfigResult<()> {
        self.scan.validate()?;
        self.resolver.validate()?;
        self.impact.validate()?;
        self.diff.validate()
    }

    /// Export to YAML (v1 schema, every field spelled out)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(self.version),
            preset: Some(self.preset.to_string()),
            scan: Some(ScanConfigPatch::from_config(&self.scan)),
            resolver: Some(ResolverConfigPatch::from_config(&self.resolver)),
            impact: Some(PropagationConfigPatch::from_config(&self.impact)),
            diff: Some(DiffConfigPatch::from_config(&self.diff)),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    pub fn describe(&self) -> String {
        format!(
            "preset={} budget={} workers={} depth={} text_fallback={} rename_hints={}",
            self.preset,
            self.scan
                .time_budget_ms
                .map(|ms| format!("{}ms", ms))
                .unwrap_or_else(|| "none".to_string()),
            self.scan.workers(),
            self.impact
                .max_depth
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unbounded".to_string()),
            self.impact.text_fallback,
            self.diff.rename_hints,
        )
    }
}
