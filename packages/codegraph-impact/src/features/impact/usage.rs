//! Usage search inside one downstream file
//!
//! Structural tier walks the syntax tree for references to imported locals
//! (`X`, `ns.X`, `ns.X` in type position). Textual tier scans lines for a
//! whole-word occurrence. Both skip import statements and `export … from`.

use std::collections::BTreeSet;
use tree_sitter::{Node, Tree};

use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::features::parsing::TreeSitterParser;
use crate::shared::models::CanonicalPath;
use crate::shared::utils::text::find_word;
use crate::shared::utils::tree_sitter::{extract_node_text, node_row, walk_preorder};

/// A local binding whose use counts as a reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalRef {
    pub local: String,
    /// For namespace bindings: only `local.member` counts
    pub member: Option<String>,
}

impl LocalRef {
    pub fn plain(local: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            member: None,
        }
    }

    pub fn member(local: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            member: Some(member.into()),
        }
    }
}

/// Parsed view of one file for usage queries
pub struct UsageScan<'s> {
    source: &'s str,
    tree: Option<Tree>,
    /// 0-based rows covered by import-like statements
    import_rows: BTreeSet<u32>,
}

impl<'s> UsageScan<'s> {
    pub fn new(path: &CanonicalPath, source: &'s str) -> Self {
        let tree = TreeSitterParser::for_path(path.as_str())
            .ok()
            .and_then(|mut parser| parser.parse(source));
        let import_rows = match &tree {
            Some(tree) => structural_import_rows(&tree.root_node(), source),
            None => textual_import_rows(source),
        };
        Self {
            source,
            tree,
            import_rows,
        }
    }

    /// First row referencing any of `refs`
    pub fn structural(&self, refs: &[LocalRef]) -> Option<u32> {
        let tree = self.tree.as_ref()?;
        if refs.is_empty() {
            return None;
        }
        let source = self.source;
        let mut found = None;
        walk_preorder(&tree.root_node(), &mut |node| {
            if found.is_some() || is_import_like(&node, source) {
                return false;
            }
            if references(&node, source, refs) {
                found = Some(node_row(&node));
                return false;
            }
            true
        });
        found
    }

    /// First row containing any of `names` as a whole word, outside import statements
    pub fn textual(&self, names: &[&str]) -> Option<u32> {
        if names.is_empty() {
            return None;
        }
        self.source
            .lines()
            .enumerate()
            .filter(|(row, _)| !self.import_rows.contains(&(*row as u32)))
            .find(|(_, line)| names.iter().any(|name| find_word(line, name).is_some()))
            .map(|(row, _)| row as u32)
    }
}

fn is_import_like(node: &Node, source: &str) -> bool {
    match node.kind() {
        node_kinds::IMPORT_STATEMENT => true,
        node_kinds::EXPORT_STATEMENT => node.child_by_field_name("source").is_some(),
        _ => {
            // `const x = require('./m')` declares the binding, it is not a use
            node.kind() == node_kinds::CALL_EXPRESSION
                && node
                    .child_by_field_name("function")
                    .is_some_and(|f| extract_node_text(&f, source) == "require")
        }
    }
}

fn references(node: &Node, source: &str, refs: &[LocalRef]) -> bool {
    match node.kind() {
        node_kinds::IDENTIFIER
        | node_kinds::TYPE_IDENTIFIER
        | node_kinds::SHORTHAND_PROPERTY_IDENTIFIER => {
            let text = extract_node_text(node, source);
            refs.iter()
                .any(|r| r.member.is_none() && r.local == text && !is_binding_site(node))
        }
        node_kinds::MEMBER_EXPRESSION => qualified_match(node, source, refs, "object", "property"),
        node_kinds::NESTED_TYPE_IDENTIFIER => qualified_match(node, source, refs, "module", "name"),
        _ => false,
    }
}

fn qualified_match(node: &Node, source: &str, refs: &[LocalRef], head: &str, tail: &str) -> bool {
    let (Some(object), Some(property)) = (
        node.child_by_field_name(head),
        node.child_by_field_name(tail),
    ) else {
        return false;
    };
    let object = extract_node_text(&object, source);
    let property = extract_node_text(&property, source);
    refs.iter()
        .any(|r| r.local == object && r.member.as_deref().map_or(false, |m| m == property))
}

/// Declarator names of `const { x } = …` style bindings
fn is_binding_site(node: &Node) -> bool {
    node.parent().is_some_and(|parent| {
        parent.kind() == node_kinds::VARIABLE_DECLARATOR
            && parent
                .child_by_field_name("name")
                .is_some_and(|name| name.id() == node.id())
    })
}

fn structural_import_rows(root: &Node, source: &str) -> BTreeSet<u32> {
    let mut rows = BTreeSet::new();
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if is_import_like(&child, source) {
            let start = child.start_position().row as u32;
            let end = child.end_position().row as u32;
            rows.extend(start..=end);
        }
    }
    rows
}

/// Line-based fallback when no tree is available
fn textual_import_rows(source: &str) -> BTreeSet<u32> {
    let mut rows = BTreeSet::new();
    let mut open = false;
    for (row, line) in source.lines().enumerate() {
        let trimmed = line.trim_start();
        let starts = trimmed.starts_with("import ")
            || trimmed.starts_with("import{")
            || (trimmed.starts_with("export ") && trimmed.contains(" from "));
        if starts || open {
            rows.insert(row as u32);
            open = !(trimmed.contains('\'') || trimmed.contains('"') || trimmed.ends_with(';'));
        }
    }
    rows
}
