//! Node helpers shared by the TypeScript extractors

use std::ops::Range;
use tree_sitter::Node;

use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::shared::utils::text::{normalize_type_text, strip_quotes};
use crate::shared::utils::tree_sitter::{extract_node_text, walk_preorder};

#[inline]
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    extract_node_text(node, source)
}

pub fn find_child_by_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .find(|child| child.kind() == kind)
}

pub fn find_children_by_kind<'t>(node: &Node<'t>, kind: &str) -> Vec<Node<'t>> {
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .filter(|child| child.kind() == kind)
        .collect()
}

/// Named children in source order, comments excluded
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .filter(|child| child.kind() != node_kinds::COMMENT)
        .collect()
}

/// Identifier text of the `name` field
pub fn field_name(node: &Node, source: &str) -> Option<String> {
    node.child_by_field_name("name")
        .map(|n| strip_quotes(node_text(&n, source)).to_string())
        .filter(|name| !name.is_empty())
}

/// Check if node has a specific modifier token as a direct child
pub fn has_modifier(node: &Node, modifier_kind: &str) -> bool {
    find_child_by_kind(node, modifier_kind).is_some()
}

pub fn is_async(node: &Node) -> bool {
    has_modifier(node, node_kinds::ASYNC)
}

pub fn is_static(node: &Node) -> bool {
    has_modifier(node, node_kinds::STATIC)
}

pub fn is_readonly(node: &Node) -> bool {
    has_modifier(node, node_kinds::READONLY)
}

pub fn is_abstract(node: &Node) -> bool {
    has_modifier(node, node_kinds::ABSTRACT)
}

pub fn is_optional_member(node: &Node) -> bool {
    has_modifier(node, node_kinds::OPTIONAL_MARK)
}

/// `private` and `#private` members are not part of the public surface
pub fn is_private_member(node: &Node, source: &str) -> bool {
    let keyword = find_child_by_kind(node, node_kinds::ACCESSIBILITY_MODIFIER)
        .map(|m| node_text(&m, source));
    if keyword == Some("private") {
        return true;
    }
    node.child_by_field_name("name")
        .map_or(false, |n| n.kind() == node_kinds::PRIVATE_PROPERTY_IDENTIFIER)
}

/// Node text with comments replaced by a space
pub fn text_without_comments(node: &Node, source: &str) -> String {
    elided_text(node, source, node.end_byte())
}

/// Declaration text up to (not including) the `body` field.
///
/// Falls back to the whole node for bodiless declarations. Parameter
/// initializers are dropped; callers only observe the optionality they imply.
pub fn declaration_head(node: &Node, source: &str) -> String {
    let end = node
        .child_by_field_name("body")
        .map(|body| body.start_byte())
        .unwrap_or_else(|| node.end_byte());
    let head = elided_text(node, source, end);
    head.trim().trim_end_matches(';').trim_end().to_string()
}

/// Edits rendering a defaulted parameter as optional: `a: T = v` reads `a?: T`
fn initializer_edits(param: &Node) -> Option<[(Range<usize>, &'static str); 2]> {
    let value = param.child_by_field_name("value")?;
    let pattern = param.child_by_field_name("pattern")?;
    let start = find_child_by_kind(param, "=")
        .map(|eq| eq.start_byte())
        .unwrap_or_else(|| value.start_byte());
    Some([
        (pattern.end_byte()..pattern.end_byte(), "?"),
        (start..value.end_byte(), ""),
    ])
}

/// Text of `node` up to byte `end` with comments and parameter initializers elided
fn elided_text(node: &Node, source: &str, end: usize) -> String {
    let mut elided: Vec<(Range<usize>, &str)> = Vec::new();
    walk_preorder(node, &mut |current| {
        if current.start_byte() >= end {
            return false;
        }
        match current.kind() {
            node_kinds::COMMENT => {
                elided.push((current.byte_range(), " "));
                false
            }
            node_kinds::REQUIRED_PARAMETER | node_kinds::OPTIONAL_PARAMETER => {
                if let Some(edits) = initializer_edits(&current) {
                    elided.extend(edits);
                }
                true
            }
            _ => true,
        }
    });
    elided.sort_by_key(|(range, _)| range.start);

    let start = node.start_byte();
    let mut out = String::with_capacity(end.saturating_sub(start));
    let mut cursor = start;
    for (range, replacement) in elided {
        // Comments inside an initializer are already covered
        if range.start < cursor {
            continue;
        }
        if let Some(text) = source.get(cursor..range.start.min(end)) {
            out.push_str(text);
        }
        out.push_str(replacement);
        cursor = range.end.min(end);
    }
    if let Some(text) = source.get(cursor..end) {
        out.push_str(text);
    }
    out
}

/// Normalized signature text of a declaration head
pub fn normalized_head(node: &Node, source: &str) -> String {
    normalize_type_text(&declaration_head(node, source))
}
