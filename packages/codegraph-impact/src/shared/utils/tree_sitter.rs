//! Tree-sitter Utility Functions
//!
//! Generic traversal helpers shared by the snapshot extractors, the project
//! scanner and the usage finder.

use tree_sitter::Node;

// ═══════════════════════════════════════════════════════════════════════════
// Node Traversal Utilities
// ═══════════════════════════════════════════════════════════════════════════

/// Find a descendant by kind (depth-first, pre-order)
pub fn find_descendant_by_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut found = None;
    walk_preorder(node, &mut |current| {
        if found.is_some() {
            return false;
        }
        if current.kind() == kind {
            found = Some(current);
            return false;
        }
        true
    });
    found
}

/// Visit `node` and its descendants in source order.
///
/// The visitor returns `false` to skip the children of the visited node.
pub fn walk_preorder<'t, F>(node: &Node<'t>, visitor: &mut F)
where
    F: FnMut(Node<'t>) -> bool,
{
    let mut stack = vec![*node];
    while let Some(current) = stack.pop() {
        if !visitor(current) {
            continue;
        }
        for i in (0..current.child_count()).rev() {
            if let Some(child) = current.child(i) {
                stack.push(child);
            }
        }
    }
}

/// Count ERROR and MISSING nodes below `node`
pub fn count_error_nodes(node: &Node) -> usize {
    if !node.has_error() {
        return 0;
    }
    let mut count = 0;
    walk_preorder(node, &mut |current| {
        if current.is_error() || current.is_missing() {
            count += 1;
        }
        current.has_error()
    });
    count
}

/// 0-based start row of a node
#[inline]
pub fn node_row(node: &Node) -> u32 {
    node.start_position().row as u32
}

/// 1-based start line of a node
#[inline]
pub fn node_line(node: &Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Extract node text, empty on out-of-range byte offsets
#[inline]
pub fn extract_node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}
