//! tsconfig.json loading
//!
//! Only `compilerOptions.baseUrl`, `compilerOptions.paths` and a relative
//! `extends` chain are read. The file is JSON with comments and trailing
//! commas, which are stripped before handing it to serde_json.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

use crate::shared::models::CanonicalPath;

const MAX_EXTENDS_DEPTH: usize = 8;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    extends: Option<String>,
    #[serde(default)]
    compiler_options: RawCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    base_url: Option<String>,
    paths: Option<BTreeMap<String, Vec<String>>>,
}

/// One `paths` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAlias {
    pub pattern: String,
    pub targets: Vec<String>,
}

impl PathAlias {
    /// Text captured by `*`, or `""` for an exact match
    pub fn matches<'s>(&self, specifier: &'s str) -> Option<&'s str> {
        match self.pattern.split_once('*') {
            None => (self.pattern == specifier).then_some(""),
            Some((prefix, suffix)) => {
                if specifier.len() >= prefix.len() + suffix.len()
                    && specifier.starts_with(prefix)
                    && specifier.ends_with(suffix)
                {
                    Some(&specifier[prefix.len()..specifier.len() - suffix.len()])
                } else {
                    None
                }
            }
        }
    }

    fn prefix_len(&self) -> usize {
        self.pattern.split_once('*').map_or(self.pattern.len(), |(p, _)| p.len())
    }
}

/// Resolved compiler options relevant to module resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsConfig {
    pub base_url: Option<CanonicalPath>,
    /// Directory `paths` targets are relative to
    pub paths_base: Option<CanonicalPath>,
    /// Sorted by descending prefix length
    pub paths: Vec<PathAlias>,
}

impl TsConfig {
    /// Load `file`, following relative `extends`. Missing or malformed files yield `None`.
    pub fn load(file: &Path) -> Option<Self> {
        let mut config = TsConfig::default();
        let mut visited = HashSet::new();
        let mut found = false;
        config.merge_from(&CanonicalPath::new(file), &mut visited, 0, &mut found);
        found.then_some(config)
    }

    fn merge_from(
        &mut self,
        file: &CanonicalPath,
        visited: &mut HashSet<CanonicalPath>,
        depth: usize,
        found: &mut bool,
    ) {
        if depth > MAX_EXTENDS_DEPTH || !visited.insert(file.clone()) {
            return;
        }
        let Ok(text) = std::fs::read_to_string(file.to_path_buf()) else {
            return;
        };
        let raw: RawTsConfig = match serde_json::from_str(&strip_jsonc(&text)) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(file = %file, error = %e, "malformed tsconfig ignored");
                return;
            }
        };
        *found = true;
        let Some(dir) = file.parent() else {
            return;
        };

        // Parent first so the child's options override it
        if let Some(parent) = raw.extends.as_deref() {
            if parent.starts_with('.') {
                let mut parent_path = dir.join(parent);
                if parent_path.extension() != Some("json") {
                    parent_path = CanonicalPath::new(format!("{}.json", parent_path));
                }
                self.merge_from(&parent_path, visited, depth + 1, found);
            } else {
                debug!(extends = parent, "package tsconfig extends not followed");
            }
        }

        if let Some(base_url) = raw.compiler_options.base_url.as_deref() {
            let base = dir.join(base_url);
            self.base_url = Some(base.clone());
            if raw.compiler_options.paths.is_none() {
                self.paths_base = Some(base);
            }
        }
        if let Some(paths) = raw.compiler_options.paths {
            self.paths_base = Some(self.base_url.clone().unwrap_or_else(|| dir.clone()));
            self.paths = paths
                .into_iter()
                .map(|(pattern, targets)| PathAlias { pattern, targets })
                .collect();
            self.paths.sort_by(|a, b| b.prefix_len().cmp(&a.prefix_len()));
        }
    }

    /// Candidate base paths for a non-relative specifier, most specific alias first
    pub fn candidates(&self, specifier: &str) -> Vec<CanonicalPath> {
        let mut out = Vec::new();
        if let Some(base) = &self.paths_base {
            if let Some(alias) = self.paths.iter().find(|a| a.matches(specifier).is_some()) {
                let captured = alias.matches(specifier).unwrap_or("");
                out.extend(
                    alias
                        .targets
                        .iter()
                        .map(|target| base.join(&target.replacen('*', captured, 1))),
                );
            }
        }
        if let Some(base_url) = &self.base_url {
            out.push(base_url.join(specifier));
        }
        out
    }
}

/// Remove `//` and `/* */` comments outside strings, then trailing commas
fn strip_jsonc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    remove_trailing_commas(&out)
}

fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if in_string {
            if c == '\\' && i + 1 < chars.len() {
                out.push(c);
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            out.push(c);
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strip_jsonc() {
        let text = "{\n  // comment\n  \"a\": \"http://x\", /* block */\n  \"b\": [1, 2,],\n}";
        let value: serde_json::Value = serde_json::from_str(&strip_jsonc(text)).unwrap();
        assert_eq!(value["a"], "http://x");
        assert_eq!(value["b"][1], 2);
    }

    #[test]
    fn test_alias_matching() {
        let alias = PathAlias {
            pattern: "@app/*".to_string(),
            targets: vec!["src/*".to_string()],
        };
        assert_eq!(alias.matches("@app/util/x"), Some("util/x"));
        assert_eq!(alias.matches("lodash"), None);

        let exact = PathAlias {
            pattern: "config".to_string(),
            targets: vec!["src/config.ts".to_string()],
        };
        assert_eq!(exact.matches("config"), Some(""));
    }

    #[test]
    fn test_load_with_extends() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("tsconfig.base.json"),
            r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "@lib/*": ["lib/*"] } } }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("tsconfig.json"),
            "{\n  \"extends\": \"./tsconfig.base\",\n  // local\n  \"compilerOptions\": { \"strict\": true, },\n}",
        )
        .unwrap();

        let config = TsConfig::load(&dir.path().join("tsconfig.json")).unwrap();
        let root = CanonicalPath::new(dir.path());
        assert_eq!(config.base_url, Some(root.clone()));
        assert_eq!(
            config.candidates("@lib/math"),
            vec![root.join("lib/math"), root.join("@lib/math")]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(TsConfig::load(&dir.path().join("tsconfig.json")).is_none());
    }
}
