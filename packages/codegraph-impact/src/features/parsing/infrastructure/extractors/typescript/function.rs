//! TypeScript Function Extractor
//!
//! Extracts function metadata from TypeScript AST:
//! - Regular and generator function declarations
//! - Bodiless signatures (`declare function`, overload signatures)
//! - Arrow functions and function expressions bound to a variable
//!
//! Captures:
//! - Name, parameters, return type
//! - Generic type parameters
//! - Modifiers (async, generator)

use tree_sitter::Node;

use super::common::*;
use super::r#type::{extract_type_annotation, type_text};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::features::snapshot::domain::{ParameterInfo, SymbolDetail, SymbolInfo, SymbolKind};
use crate::shared::utils::text::normalize_type_text;
use crate::shared::utils::tree_sitter::node_line;

/// Extract function parameters from a `formal_parameters` node
pub fn extract_parameters(params_node: &Node, source: &str) -> Vec<ParameterInfo> {
    named_children(params_node)
        .iter()
        .filter_map(|param| match param.kind() {
            node_kinds::REQUIRED_PARAMETER => extract_parameter(param, source, false),
            node_kinds::OPTIONAL_PARAMETER => extract_parameter(param, source, true),
            node_kinds::REST_PARAMETER => extract_parameter(param, source, false).map(|mut p| {
                p.is_rest = true;
                p
            }),
            _ => None,
        })
        .collect()
}

/// Extract single parameter info
fn extract_parameter(node: &Node, source: &str, is_optional: bool) -> Option<ParameterInfo> {
    let pattern = node
        .child_by_field_name("pattern")
        .or_else(|| find_child_by_kind(node, node_kinds::IDENTIFIER))?;

    // `...args` arrives as a rest_pattern around the identifier
    let (name, is_rest) = if pattern.kind() == node_kinds::REST_PATTERN {
        let inner = named_children(&pattern)
            .first()
            .map(|n| node_text(n, source).to_string())
            .unwrap_or_default();
        (inner, true)
    } else {
        (normalize_type_text(node_text(&pattern, source)), false)
    };

    let type_annotation = node
        .child_by_field_name("type")
        .or_else(|| find_child_by_kind(node, node_kinds::TYPE_ANNOTATION))
        .and_then(|n| extract_type_annotation(&n, source));

    Some(ParameterInfo {
        name,
        type_annotation,
        // A defaulted parameter can be omitted by callers
        is_optional: is_optional || node.child_by_field_name("value").is_some(),
        is_rest,
    })
}

/// Parameters of any function-like node (`parameters` field or single arrow parameter)
pub fn parameters_of(node: &Node, source: &str) -> Vec<ParameterInfo> {
    if let Some(params) = node
        .child_by_field_name("parameters")
        .or_else(|| find_child_by_kind(node, node_kinds::FORMAL_PARAMETERS))
    {
        return extract_parameters(&params, source);
    }
    // `x => x + 1`
    node.child_by_field_name("parameter")
        .map(|p| vec![ParameterInfo::new(node_text(&p, source))])
        .unwrap_or_default()
}

/// Return type annotation of a function-like node
pub fn return_type_of(node: &Node, source: &str) -> Option<String> {
    node.child_by_field_name("return_type")
        .and_then(|n| extract_type_annotation(&n, source))
}

/// Extract generic type parameters
pub fn type_parameters_of(node: &Node, source: &str) -> Vec<String> {
    node.child_by_field_name("type_parameters")
        .or_else(|| find_child_by_kind(node, node_kinds::TYPE_PARAMETERS))
        .map(|tp| {
            named_children(&tp)
                .iter()
                .filter(|p| p.kind() == node_kinds::TYPE_PARAMETER)
                .map(|p| type_text(p, source))
                .collect()
        })
        .unwrap_or_default()
}

fn function_detail(node: &Node, source: &str, is_arrow: bool) -> SymbolDetail {
    SymbolDetail::Function {
        is_async: is_async(node),
        is_arrow,
        is_generator: node.kind() == node_kinds::GENERATOR_FUNCTION_DECLARATION
            || node.kind() == node_kinds::GENERATOR_FUNCTION
            || has_modifier(node, "*"),
        type_parameters: type_parameters_of(node, source),
    }
}

/// Extract a function declaration or bodiless function signature
pub fn extract_function_declaration(
    node: &Node,
    source: &str,
    is_exported: bool,
) -> Option<SymbolInfo> {
    // `export default function () {}` has no name
    let name = field_name(node, source).unwrap_or_else(|| "default".to_string());

    Some(SymbolInfo {
        qualified_name: name.clone(),
        name,
        kind: SymbolKind::Function,
        signature: normalized_head(node, source),
        return_type: return_type_of(node, source),
        parameters: parameters_of(node, source),
        is_exported,
        overloads: Vec::new(),
        line: node_line(node),
        detail: function_detail(node, source, false),
    })
}

/// Extract a function-valued variable: `const name = (..) => ..` / `const name = function (..) {..}`.
///
/// `keyword` is the declaration keyword (`const`, `let`, `var`), empty for assignments.
pub fn extract_function_value(
    keyword: &str,
    declarator: &Node,
    value: &Node,
    source: &str,
    is_exported: bool,
) -> Option<SymbolInfo> {
    // Declarators carry a `name`; CommonJS assignments a `left`
    let name = field_name(declarator, source).or_else(|| {
        declarator
            .child_by_field_name("left")
            .map(|left| node_text(&left, source).to_string())
    })?;

    // Binding part (`name: T = `) followed by the value's header
    let binding = source
        .get(declarator.start_byte()..value.start_byte())
        .unwrap_or("");
    let signature = normalize_type_text(&format!(
        "{} {}{}",
        keyword,
        binding,
        declaration_head(value, source)
    ));

    let is_arrow = value.kind() == node_kinds::ARROW_FUNCTION;
    Some(SymbolInfo {
        qualified_name: name.clone(),
        name,
        kind: SymbolKind::Function,
        signature,
        return_type: return_type_of(value, source),
        parameters: parameters_of(value, source),
        is_exported,
        overloads: Vec::new(),
        line: node_line(declarator),
        detail: function_detail(value, source, is_arrow),
    })
}

/// Compact `(a:T,b?:U,...c:V[])` rendering of a parameter list
pub fn render_parameters(params: &[ParameterInfo]) -> String {
    let rendered: Vec<String> = params
        .iter()
        .map(|p| {
            let mut out = String::new();
            if p.is_rest {
                out.push_str("...");
            }
            out.push_str(&p.name);
            if p.is_optional && !p.is_rest {
                out.push('?');
            }
            if let Some(ty) = &p.type_annotation {
                out.push(':');
                out.push_str(ty);
            }
            out
        })
        .collect();
    format!("({})", rendered.join(","))
}
