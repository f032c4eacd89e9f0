//! Configuration System
//!
//! Three layers, later ones winning:
//! - Preset (`fast | balanced | thorough`) - complete defaults
//! - YAML file (v1 schema) - per-section patches over the preset
//! - Environment - `CODEGRAPH_IMPACT_PRESET`, `CODEGRAPH_IMPACT_TIME_BUDGET_MS`,
//!   `CODEGRAPH_IMPACT_WORKERS`
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_impact::config::{ImpactConfig, Preset};
//!
//! let config = ImpactConfig::preset(Preset::Fast);
//! let config = ImpactConfig::from_yaml("impact.yaml")?;
//! ```

pub mod error;
pub mod impact_config;
pub mod io;
pub mod patch;
pub mod preset;
pub mod stage_configs;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use impact_config::{ImpactConfig, ENV_PRESET, ENV_TIME_BUDGET_MS, ENV_WORKERS};
pub use io::ConfigFileV1;
pub use preset::Preset;
pub use stage_configs::{DiffConfig, PropagationConfig, ResolverConfig, ScanConfig};
pub use validation::Validatable;
