//! Module reference extraction
//!
//! Structural tier: import, re-export, `require` and `import()` records from a
//! parsed snapshot. Textual tier: regexes over the raw source, used when the
//! file could not be parsed and merged in when the parse was degraded.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::types::{ExtractionTier, ModuleReference, ReferenceKind};
use crate::features::snapshot::domain::{ImportKind, ParseStatus, SymbolSnapshot};

static STATIC_FROM: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*(import|export)\b[^;'"`]*?\bfrom\s*['"]([^'"\n]+)['"]"#).ok()
});
static SIDE_EFFECT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"(?m)^[ \t]*import\s*['"]([^'"\n]+)['"]"#).ok());
static REQUIRE_CALL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).ok());
static DYNAMIC_IMPORT: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#).ok());

/// References of a file, choosing the tier from its parse status
pub fn extract_references(snapshot: &SymbolSnapshot, source: &str) -> Vec<ModuleReference> {
    match snapshot.parse_status {
        ParseStatus::Clean => references_from_snapshot(snapshot),
        ParseStatus::Failed => references_from_text(source),
        ParseStatus::Degraded { .. } => {
            let mut refs = references_from_snapshot(snapshot);
            let seen: HashSet<(String, u32)> =
                refs.iter().map(|r| (r.specifier.clone(), r.line)).collect();
            refs.extend(
                references_from_text(source)
                    .into_iter()
                    .filter(|r| !seen.contains(&(r.specifier.clone(), r.line))),
            );
            refs.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.specifier.cmp(&b.specifier)));
            refs
        }
    }
}

/// Structural tier
pub fn references_from_snapshot(snapshot: &SymbolSnapshot) -> Vec<ModuleReference> {
    let mut refs: Vec<ModuleReference> = snapshot
        .imports
        .iter()
        .map(|import| ModuleReference {
            specifier: import.module_specifier.clone(),
            line: import.line.saturating_sub(1),
            kind: match import.kind {
                ImportKind::Static | ImportKind::SideEffect => ReferenceKind::Import,
                ImportKind::Require => ReferenceKind::Require,
                ImportKind::Dynamic => ReferenceKind::DynamicImport,
            },
            tier: ExtractionTier::Structural,
        })
        .collect();

    let mut seen = HashSet::new();
    for export in &snapshot.exports {
        let Some(reexport) = &export.reexport else {
            continue;
        };
        if seen.insert((reexport.source_module.as_str(), export.line)) {
            refs.push(ModuleReference {
                specifier: reexport.source_module.clone(),
                line: export.line.saturating_sub(1),
                kind: ReferenceKind::Reexport,
                tier: ExtractionTier::Structural,
            });
        }
    }

    refs.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.specifier.cmp(&b.specifier)));
    refs
}

/// Textual tier
pub fn references_from_text(source: &str) -> Vec<ModuleReference> {
    let line_starts = line_starts(source);
    let mut refs = Vec::new();

    let mut collect = |regex: &Lazy<Option<Regex>>, kind: Option<ReferenceKind>| {
        let Some(regex) = regex.as_ref() else {
            return;
        };
        for caps in regex.captures_iter(source) {
            let (Some(whole), Some(spec)) = (caps.get(0), caps.get(caps.len() - 1)) else {
                continue;
            };
            let kind = kind.unwrap_or_else(|| match caps.get(1).map(|m| m.as_str()) {
                Some("export") => ReferenceKind::Reexport,
                _ => ReferenceKind::Import,
            });
            refs.push(ModuleReference {
                specifier: spec.as_str().to_string(),
                line: line_of(&line_starts, whole.start() + leading_ws(whole.as_str())),
                kind,
                tier: ExtractionTier::Textual,
            });
        }
    };

    collect(&STATIC_FROM, None);
    collect(&SIDE_EFFECT, Some(ReferenceKind::Import));
    collect(&REQUIRE_CALL, Some(ReferenceKind::Require));
    collect(&DYNAMIC_IMPORT, Some(ReferenceKind::DynamicImport));

    refs.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| a.specifier.cmp(&b.specifier)));
    refs.dedup_by(|a, b| a.line == b.line && a.specifier == b.specifier);
    refs
}

fn leading_ws(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

fn line_starts(source: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(source.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// 0-based line containing byte `offset`
fn line_of(line_starts: &[usize], offset: usize) -> u32 {
    match line_starts.binary_search(&offset) {
        Ok(line) => line as u32,
        Err(next) => next.saturating_sub(1) as u32,
    }
}
