//! TypeScript Type Extractor
//!
//! Extracts type texts and type alias declarations:
//! - Type annotations (`: T`) as normalized text
//! - Object-literal types as a structural shape
//! - Function types as a call signature
//!
//! No hardcoded strings - uses constants from node_kinds

use tree_sitter::Node;

use super::common::*;
use super::function::{extract_parameters, return_type_of};
use super::interface::extract_shape_members;
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::features::snapshot::domain::{
    CallSignature, ShapeDetail, SymbolDetail, SymbolInfo, SymbolKind,
};
use crate::shared::utils::text::normalize_type_text;
use crate::shared::utils::tree_sitter::node_line;

/// Normalized text of any type node
pub fn type_text(node: &Node, source: &str) -> String {
    normalize_type_text(&text_without_comments(node, source))
}

/// Extract the type from a `type_annotation` node (`: T` yields `T`)
pub fn extract_type_annotation(node: &Node, source: &str) -> Option<String> {
    // Predicate/asserts annotations carry their own shape; fall back to raw text
    match named_children(node).first() {
        Some(inner) if node.kind() == node_kinds::TYPE_ANNOTATION => Some(type_text(inner, source)),
        _ => {
            let text = type_text(node, source);
            let text = text.trim_start_matches(':').to_string();
            (!text.is_empty()).then_some(text)
        }
    }
}

/// Unwrap `(T)` parentheses around a type
fn unparenthesize<'t>(node: Node<'t>) -> Node<'t> {
    let mut current = node;
    while current.kind() == node_kinds::PARENTHESIZED_TYPE {
        match named_children(&current).first() {
            Some(inner) => current = *inner,
            None => break,
        }
    }
    current
}

/// Call signature of a `(a: A) => R` function type
pub fn extract_function_type(node: &Node, source: &str) -> CallSignature {
    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| extract_parameters(&params, source))
        .unwrap_or_default();
    let return_type = node
        .child_by_field_name("return_type")
        .map(|ret| type_text(&ret, source))
        .or_else(|| return_type_of(node, source));
    CallSignature {
        parameters,
        return_type,
    }
}

/// Structural shape of a type alias value, when it has one
pub fn extract_type_shape(value: &Node, source: &str) -> Option<ShapeDetail> {
    let value = unparenthesize(*value);
    match value.kind() {
        node_kinds::OBJECT_TYPE => Some(extract_shape_members(&value, source, Vec::new())),
        node_kinds::FUNCTION_TYPE => Some(ShapeDetail {
            call_signature: Some(extract_function_type(&value, source)),
            ..ShapeDetail::default()
        }),
        _ => None,
    }
}

/// Extract a `type Name<T> = ...` declaration
pub fn extract_type_alias(node: &Node, source: &str, is_exported: bool) -> Option<SymbolInfo> {
    let name = field_name(node, source)?;
    let value = node.child_by_field_name("value")?;

    let type_text_value = type_text(&value, source);
    let shape = extract_type_shape(&value, source);

    Some(SymbolInfo {
        qualified_name: name.clone(),
        name,
        kind: SymbolKind::Type,
        signature: normalize_type_text(&text_without_comments(node, source)),
        return_type: Some(type_text_value.clone()),
        parameters: Vec::new(),
        is_exported,
        overloads: Vec::new(),
        line: node_line(node),
        detail: SymbolDetail::TypeAlias {
            type_text: type_text_value,
            shape,
        },
    })
}
