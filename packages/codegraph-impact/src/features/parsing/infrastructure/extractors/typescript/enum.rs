//! TypeScript Enum Extractor

use tree_sitter::Node;

use super::common::*;
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::features::snapshot::domain::{SymbolDetail, SymbolInfo, SymbolKind};
use crate::shared::utils::text::{normalize_type_text, strip_quotes};
use crate::shared::utils::tree_sitter::node_line;

pub fn extract_enum(node: &Node, source: &str, is_exported: bool) -> Option<SymbolInfo> {
    let name = field_name(node, source)?;

    let members = node
        .child_by_field_name("body")
        .map(|body| {
            named_children(&body)
                .iter()
                .filter_map(|member| match member.kind() {
                    node_kinds::ENUM_ASSIGNMENT => field_name(member, source),
                    node_kinds::PROPERTY_IDENTIFIER | node_kinds::STRING => {
                        Some(strip_quotes(node_text(member, source)).to_string())
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Some(SymbolInfo {
        qualified_name: name.clone(),
        name,
        kind: SymbolKind::Enum,
        signature: normalize_type_text(&text_without_comments(node, source)),
        return_type: None,
        parameters: Vec::new(),
        is_exported,
        overloads: Vec::new(),
        line: node_line(node),
        detail: SymbolDetail::Enum {
            members,
            is_const: has_modifier(node, "const"),
        },
    })
}
