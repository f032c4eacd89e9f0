//! TypeScript Interface Extractor
//!
//! Interfaces and object-literal types share one member walk producing a
//! `ShapeDetail`.

use tree_sitter::Node;

use super::common::*;
use super::function::{parameters_of, return_type_of};
use super::r#type::{extract_type_annotation, type_text};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::features::snapshot::domain::{
    CallSignature, IndexSignature, MethodSignatureInfo, PropertyInfo, ShapeDetail, SymbolDetail,
    SymbolInfo, SymbolKind,
};
use crate::shared::utils::text::normalize_type_text;
use crate::shared::utils::tree_sitter::node_line;

pub fn extract_interface(node: &Node, source: &str, is_exported: bool) -> Option<SymbolInfo> {
    let name = field_name(node, source)?;
    let extends = extract_interface_extends(node, source);
    let shape = node
        .child_by_field_name("body")
        .map(|body| extract_shape_members(&body, source, extends.clone()))
        .unwrap_or_else(|| ShapeDetail {
            extends,
            ..ShapeDetail::default()
        });

    Some(SymbolInfo {
        qualified_name: name.clone(),
        name,
        kind: SymbolKind::Interface,
        signature: normalize_type_text(&text_without_comments(node, source)),
        return_type: None,
        parameters: Vec::new(),
        is_exported,
        overloads: Vec::new(),
        line: node_line(node),
        detail: SymbolDetail::Interface(shape),
    })
}

fn extract_interface_extends(node: &Node, source: &str) -> Vec<String> {
    find_child_by_kind(node, node_kinds::EXTENDS_TYPE_CLAUSE)
        .map(|clause| {
            named_children(&clause)
                .iter()
                .map(|t| type_text(t, source))
                .collect()
        })
        .unwrap_or_default()
}

/// Walk the members of an `interface_body` / `object_type`
pub fn extract_shape_members(body: &Node, source: &str, extends: Vec<String>) -> ShapeDetail {
    let mut shape = ShapeDetail {
        extends,
        ..ShapeDetail::default()
    };

    for member in named_children(body) {
        match member.kind() {
            node_kinds::PROPERTY_SIGNATURE => {
                if let Some(name) = field_name(&member, source) {
                    shape.properties.push(PropertyInfo {
                        name,
                        type_text: member
                            .child_by_field_name("type")
                            .and_then(|t| extract_type_annotation(&t, source)),
                        is_optional: is_optional_member(&member),
                        is_readonly: is_readonly(&member),
                    });
                }
            }
            node_kinds::METHOD_SIGNATURE => {
                if let Some(name) = field_name(&member, source) {
                    shape.methods.push(MethodSignatureInfo {
                        name,
                        parameters: parameters_of(&member, source),
                        return_type: return_type_of(&member, source),
                        is_optional: is_optional_member(&member),
                    });
                }
            }
            node_kinds::CALL_SIGNATURE if shape.call_signature.is_none() => {
                shape.call_signature = Some(CallSignature {
                    parameters: parameters_of(&member, source),
                    return_type: return_type_of(&member, source),
                });
            }
            node_kinds::INDEX_SIGNATURE if shape.index_signature.is_none() => {
                shape.index_signature = extract_index_signature(&member, source);
            }
            _ => {}
        }
    }

    shape
}

/// `[key: string]: V`
fn extract_index_signature(node: &Node, source: &str) -> Option<IndexSignature> {
    let key_name = node
        .child_by_field_name("name")
        .or_else(|| find_child_by_kind(node, node_kinds::IDENTIFIER))
        .map(|n| node_text(&n, source).to_string())?;
    let key_type = node
        .child_by_field_name("index_type")
        .map(|n| type_text(&n, source))
        .unwrap_or_default();
    let value_type = node
        .child_by_field_name("type")
        .or_else(|| find_child_by_kind(node, node_kinds::TYPE_ANNOTATION))
        .and_then(|n| extract_type_annotation(&n, source));

    Some(IndexSignature {
        key_name,
        key_type,
        value_type,
        is_readonly: is_readonly(node),
    })
}
