//! TypeScript Variable Extractor
//!
//! `const`/`let`/`var` declarations. Function-valued declarators become
//! function symbols; everything else is only recorded by name so exports can
//! be classified as variables.

use tree_sitter::Node;

use super::common::*;
use super::function::extract_function_value;
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::{
    is_function_value, node_kinds,
};
use crate::features::snapshot::domain::SymbolInfo;

/// Bindings introduced by one variable declaration statement
#[derive(Debug, Default)]
pub struct VariableBindings {
    pub functions: Vec<SymbolInfo>,
    pub variables: Vec<String>,
}

/// Strip wrappers that don't change what is bound: `(x)`, `x as T`, `x satisfies T`
fn unwrap_value<'t>(node: Node<'t>) -> Node<'t> {
    let mut current = node;
    while matches!(
        current.kind(),
        "parenthesized_expression" | "as_expression" | "satisfies_expression"
    ) {
        match named_children(&current).first() {
            Some(inner) => current = *inner,
            None => break,
        }
    }
    current
}

/// Identifiers bound by a destructuring pattern, defaults excluded
fn collect_pattern_names(pattern: &Node, source: &str, out: &mut Vec<String>) {
    match pattern.kind() {
        node_kinds::IDENTIFIER | "shorthand_property_identifier_pattern" => {
            out.push(node_text(pattern, source).to_string());
        }
        "pair_pattern" => {
            if let Some(value) = pattern.child_by_field_name("value") {
                collect_pattern_names(&value, source, out);
            }
        }
        "object_assignment_pattern" | "assignment_pattern" => {
            if let Some(left) = pattern.child_by_field_name("left") {
                collect_pattern_names(&left, source, out);
            }
        }
        _ => {
            for child in named_children(pattern) {
                collect_pattern_names(&child, source, out);
            }
        }
    }
}

pub fn extract_variable_declaration(
    node: &Node,
    source: &str,
    is_exported: bool,
) -> VariableBindings {
    let mut bindings = VariableBindings::default();
    let keyword = node
        .child(0)
        .map(|k| node_text(&k, source))
        .filter(|k| matches!(*k, "const" | "let" | "var"))
        .unwrap_or("const");

    for declarator in find_children_by_kind(node, node_kinds::VARIABLE_DECLARATOR) {
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };

        if name_node.kind() == node_kinds::IDENTIFIER {
            let value = declarator.child_by_field_name("value").map(unwrap_value);
            if let Some(value) = value.filter(|v| is_function_value(v.kind())) {
                if let Some(info) =
                    extract_function_value(keyword, &declarator, &value, source, is_exported)
                {
                    bindings.functions.push(info);
                    continue;
                }
            }
            bindings.variables.push(node_text(&name_node, source).to_string());
        } else {
            collect_pattern_names(&name_node, source, &mut bindings.variables);
        }
    }

    bindings
}
