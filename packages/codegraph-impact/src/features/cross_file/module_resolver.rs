//! Module specifier resolution
//!
//! A [`ResolverChain`] asks each [`ModuleResolver`] in turn and takes the first
//! hit. [`TsConfigResolver`] understands `baseUrl`/`paths`; [`RelativeResolver`]
//! is the fallback for plain relative specifiers. Bare package specifiers
//! resolve to nothing.

use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

use super::tsconfig::TsConfig;
use crate::config::ResolverConfig;
use crate::shared::models::CanonicalPath;

/// Resolves a specifier written in `importer` to a file on disk
pub trait ModuleResolver: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(&self, importer: &CanonicalPath, specifier: &str) -> Option<CanonicalPath>;
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with('/')
}

// ═══════════════════════════════════════════════════════════════════════════
// File probing
// ═══════════════════════════════════════════════════════════════════════════

/// Extension and index probing with a memoized existence check
#[derive(Debug)]
pub struct FileProbe {
    probe_extensions: Vec<String>,
    index_files: Vec<String>,
    exists: DashMap<CanonicalPath, bool>,
}

impl FileProbe {
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            probe_extensions: config.probe_extensions.clone(),
            index_files: config.index_files.clone(),
            exists: DashMap::new(),
        }
    }

    pub fn is_file(&self, path: &CanonicalPath) -> bool {
        if let Some(hit) = self.exists.get(path) {
            return *hit;
        }
        let found = path.to_path_buf().is_file();
        self.exists.insert(path.clone(), found);
        found
    }

    /// Number of memoized existence checks
    pub fn memo_len(&self) -> usize {
        self.exists.len()
    }

    /// Resolve `base` as written (file, `.js`→`.ts`, extension probing, index file)
    pub fn probe(&self, base: &CanonicalPath) -> Option<CanonicalPath> {
        if let Some(rewritten) = self.rewrite_js_extension(base) {
            return Some(rewritten);
        }
        if base.extension().is_some() && self.is_file(base) {
            return Some(base.clone());
        }
        for ext in &self.probe_extensions {
            let candidate = CanonicalPath::new(format!("{}.{}", base, ext));
            if self.is_file(&candidate) {
                return Some(candidate);
            }
        }
        for index in &self.index_files {
            for ext in &self.probe_extensions {
                let candidate = base.join(&format!("{}.{}", index, ext));
                if self.is_file(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    /// `./a.js` written in TypeScript sources refers to `./a.ts`
    fn rewrite_js_extension(&self, base: &CanonicalPath) -> Option<CanonicalPath> {
        let replacements: &[&str] = match base.extension()? {
            "js" => &["ts", "tsx"],
            "jsx" => &["tsx"],
            "mjs" => &["mts"],
            "cjs" => &["cts"],
            _ => return None,
        };
        let raw = base.as_str();
        let stem = &raw[..raw.rfind('.')?];
        replacements
            .iter()
            .map(|ext| CanonicalPath::new(format!("{}.{}", stem, ext)))
            .find(|candidate| self.is_file(candidate))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Resolvers
// ═══════════════════════════════════════════════════════════════════════════

/// Relative path + extension probing + index fallback
#[derive(Debug)]
pub struct RelativeResolver {
    probe: Arc<FileProbe>,
}

impl RelativeResolver {
    pub fn new(probe: Arc<FileProbe>) -> Self {
        Self { probe }
    }
}

impl ModuleResolver for RelativeResolver {
    fn name(&self) -> &'static str {
        "relative"
    }

    fn resolve(&self, importer: &CanonicalPath, specifier: &str) -> Option<CanonicalPath> {
        if !is_relative(specifier) {
            return None;
        }
        let dir = importer.parent()?;
        self.probe.probe(&dir.join(specifier))
    }
}

/// tsconfig-aware resolution: relative specifiers, `paths` aliases, `baseUrl`
#[derive(Debug)]
pub struct TsConfigResolver {
    config: TsConfig,
    probe: Arc<FileProbe>,
}

impl TsConfigResolver {
    pub fn new(config: TsConfig, probe: Arc<FileProbe>) -> Self {
        Self { config, probe }
    }

    pub fn config(&self) -> &TsConfig {
        &self.config
    }
}

impl ModuleResolver for TsConfigResolver {
    fn name(&self) -> &'static str {
        "tsconfig"
    }

    fn resolve(&self, importer: &CanonicalPath, specifier: &str) -> Option<CanonicalPath> {
        if is_relative(specifier) {
            let dir = importer.parent()?;
            return self.probe.probe(&dir.join(specifier));
        }
        self.config
            .candidates(specifier)
            .iter()
            .find_map(|candidate| self.probe.probe(candidate))
    }
}

/// Ordered resolver list; first hit wins
pub struct ResolverChain {
    resolvers: Vec<Box<dyn ModuleResolver>>,
    probe: Arc<FileProbe>,
}

impl ResolverChain {
    pub fn new(resolvers: Vec<Box<dyn ModuleResolver>>, probe: Arc<FileProbe>) -> Self {
        Self { resolvers, probe }
    }

    /// tsconfig resolver (when the project has one) followed by the relative resolver
    pub fn for_project(root: &Path, config: &ResolverConfig) -> Self {
        let probe = Arc::new(FileProbe::new(config));
        let mut resolvers: Vec<Box<dyn ModuleResolver>> = Vec::new();

        match TsConfig::load(&root.join(&config.tsconfig)) {
            Some(tsconfig) => {
                debug!(
                    base_url = ?tsconfig.base_url.as_ref().map(|p| p.to_string()),
                    aliases = tsconfig.paths.len(),
                    "tsconfig loaded"
                );
                resolvers.push(Box::new(TsConfigResolver::new(tsconfig, Arc::clone(&probe))));
            }
            None => debug!(file = %config.tsconfig, "no tsconfig, relative resolution only"),
        }
        resolvers.push(Box::new(RelativeResolver::new(Arc::clone(&probe))));

        Self::new(resolvers, probe)
    }

    pub fn resolve(&self, importer: &CanonicalPath, specifier: &str) -> Option<CanonicalPath> {
        for resolver in &self.resolvers {
            if let Some(target) = resolver.resolve(importer, specifier) {
                trace!(resolver = resolver.name(), specifier, target = %target, "resolved");
                return Some(target);
            }
        }
        trace!(importer = %importer, specifier, "unresolved specifier dropped");
        None
    }

    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub fn probe(&self) -> &FileProbe {
        &self.probe
    }
}
