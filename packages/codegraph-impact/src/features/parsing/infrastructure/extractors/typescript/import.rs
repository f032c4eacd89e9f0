//! TypeScript Import Extractor
//!
//! Handles every way a module can pull in another:
//! - Named imports: import { foo, bar as baz } from 'module'
//! - Default imports: import foo from 'module'
//! - Namespace imports: import * as foo from 'module'
//! - Side-effect imports: import 'module'
//! - `import foo = require('module')`
//! - `require('module')` and `import('module')` calls

use tree_sitter::Node;

use super::common::*;
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::features::snapshot::domain::{ImportBinding, ImportInfo, ImportKind};
use crate::shared::utils::text::strip_quotes;
use crate::shared::utils::tree_sitter::node_line;

/// Module specifier of a string literal node
fn specifier_text(node: &Node, source: &str) -> Option<String> {
    if node.kind() != node_kinds::STRING && node.kind() != node_kinds::TEMPLATE_STRING {
        return None;
    }
    let text = strip_quotes(node_text(node, source));
    // Template literals with substitutions can't be resolved statically
    (!text.is_empty() && !text.contains("${")).then(|| text.to_string())
}

pub fn extract_import_statement(node: &Node, source: &str) -> Option<ImportInfo> {
    if node.kind() != node_kinds::IMPORT_STATEMENT {
        return None;
    }
    let is_type_only = has_modifier(node, "type");

    if let Some(require) = find_child_by_kind(node, node_kinds::IMPORT_REQUIRE_CLAUSE) {
        let module_specifier = require
            .child_by_field_name("source")
            .or_else(|| find_child_by_kind(&require, node_kinds::STRING))
            .and_then(|s| specifier_text(&s, source))?;
        let bindings = find_child_by_kind(&require, node_kinds::IDENTIFIER)
            .map(|id| ImportBinding::Namespace {
                local: node_text(&id, source).to_string(),
            })
            .into_iter()
            .collect();
        return Some(ImportInfo {
            module_specifier,
            line: node_line(node),
            bindings,
            is_type_only,
            kind: ImportKind::Require,
        });
    }

    let module_specifier = node
        .child_by_field_name("source")
        .or_else(|| find_child_by_kind(node, node_kinds::STRING))
        .and_then(|s| specifier_text(&s, source))?;

    let (bindings, kind) = match find_child_by_kind(node, node_kinds::IMPORT_CLAUSE) {
        Some(clause) => (extract_import_clause(&clause, source), ImportKind::Static),
        None => (Vec::new(), ImportKind::SideEffect),
    };

    Some(ImportInfo {
        module_specifier,
        line: node_line(node),
        bindings,
        is_type_only,
        kind,
    })
}

fn extract_import_clause(clause: &Node, source: &str) -> Vec<ImportBinding> {
    let mut bindings = Vec::new();

    for child in named_children(clause) {
        match child.kind() {
            node_kinds::IDENTIFIER => bindings.push(ImportBinding::Default {
                local: node_text(&child, source).to_string(),
            }),
            node_kinds::NAMESPACE_IMPORT => {
                if let Some(id) = find_child_by_kind(&child, node_kinds::IDENTIFIER) {
                    bindings.push(ImportBinding::Namespace {
                        local: node_text(&id, source).to_string(),
                    });
                }
            }
            node_kinds::NAMED_IMPORTS => {
                for spec in find_children_by_kind(&child, node_kinds::IMPORT_SPECIFIER) {
                    let Some(imported) = field_name(&spec, source) else {
                        continue;
                    };
                    let local = spec
                        .child_by_field_name("alias")
                        .map(|a| node_text(&a, source).to_string())
                        .unwrap_or_else(|| imported.clone());
                    bindings.push(if imported == "default" {
                        ImportBinding::Default { local }
                    } else {
                        ImportBinding::Named { imported, local }
                    });
                }
            }
            _ => {}
        }
    }

    bindings
}

/// `require('m')` / `import('m')` call with a static specifier
pub fn extract_call_import(node: &Node, source: &str) -> Option<ImportInfo> {
    if node.kind() != node_kinds::CALL_EXPRESSION {
        return None;
    }
    let function = node.child_by_field_name("function")?;
    let kind = match function.kind() {
        node_kinds::IMPORT => ImportKind::Dynamic,
        node_kinds::IDENTIFIER if node_text(&function, source) == "require" => ImportKind::Require,
        _ => return None,
    };

    let arguments = node.child_by_field_name("arguments")?;
    let first = named_children(&arguments).into_iter().next()?;
    let module_specifier = specifier_text(&first, source)?;

    Some(ImportInfo {
        module_specifier,
        line: node_line(node),
        bindings: call_bindings(node, source),
        is_type_only: false,
        kind,
    })
}

/// Bindings of `const x = require(..)` / `const { a, b: c } = await import(..)`
fn call_bindings(call: &Node, source: &str) -> Vec<ImportBinding> {
    let mut current = *call;
    while let Some(parent) = current.parent() {
        if parent.kind() == "await_expression" || parent.kind() == "parenthesized_expression" {
            current = parent;
            continue;
        }
        if parent.kind() != node_kinds::VARIABLE_DECLARATOR {
            return Vec::new();
        }
        let Some(name) = parent.child_by_field_name("name") else {
            return Vec::new();
        };
        return match name.kind() {
            node_kinds::IDENTIFIER => vec![ImportBinding::Namespace {
                local: node_text(&name, source).to_string(),
            }],
            "object_pattern" => named_children(&name)
                .iter()
                .filter_map(|prop| match prop.kind() {
                    "shorthand_property_identifier_pattern" => {
                        let text = node_text(prop, source).to_string();
                        Some(ImportBinding::Named {
                            imported: text.clone(),
                            local: text,
                        })
                    }
                    "pair_pattern" => {
                        let key = prop.child_by_field_name("key")?;
                        let value = prop.child_by_field_name("value")?;
                        Some(ImportBinding::Named {
                            imported: strip_quotes(node_text(&key, source)).to_string(),
                            local: node_text(&value, source).to_string(),
                        })
                    }
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
    }
    Vec::new()
}
