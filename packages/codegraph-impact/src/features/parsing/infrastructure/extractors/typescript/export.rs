//! TypeScript Export Extractor
//!
//! Splits an `export_statement` into the exported names it introduces directly
//! (`export { a as b }`, re-exports, star exports) and the declaration or
//! default value it wraps, which the snapshot builder extracts as symbols.

use tree_sitter::Node;

use super::common::*;
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::features::snapshot::domain::{DeclaredKind, ExportInfo, ExportKind, ReexportInfo};
use crate::shared::utils::text::strip_quotes;
use crate::shared::utils::tree_sitter::node_line;

/// Pieces of one `export ...` statement
#[derive(Debug, Default)]
pub struct ExportStatement<'t> {
    /// Names exported by clauses and re-exports
    pub exports: Vec<ExportInfo>,
    /// `export <declaration>` / `export default <declaration>`
    pub declaration: Option<Node<'t>>,
    /// `export default <expr>` / `export = <expr>`
    pub default_value: Option<Node<'t>>,
    pub is_default: bool,
}

/// Export entry for a symbol declared by the statement itself
pub fn export_for_declaration(
    symbol_name: &str,
    declared_kind: DeclaredKind,
    line: u32,
    is_default: bool,
) -> ExportInfo {
    if is_default {
        ExportInfo {
            name: "default".to_string(),
            kind: ExportKind::Default,
            declared_kind,
            line,
            local_name: (symbol_name != "default").then(|| symbol_name.to_string()),
            reexport: None,
        }
    } else {
        ExportInfo {
            name: symbol_name.to_string(),
            kind: ExportKind::Named,
            declared_kind,
            line,
            local_name: None,
            reexport: None,
        }
    }
}

fn kind_for_name(name: &str) -> ExportKind {
    if name == "default" {
        ExportKind::Default
    } else {
        ExportKind::Named
    }
}

pub fn extract_export_statement<'t>(node: &Node<'t>, source: &str) -> ExportStatement<'t> {
    let mut stmt = ExportStatement {
        is_default: has_modifier(node, "default") || has_modifier(node, "="),
        ..ExportStatement::default()
    };
    let line = node_line(node);

    if let Some(decl) = node.child_by_field_name("declaration") {
        stmt.declaration = Some(decl);
        return stmt;
    }

    let source_module = node
        .child_by_field_name("source")
        .or_else(|| find_child_by_kind(node, node_kinds::STRING))
        .map(|s| strip_quotes(node_text(&s, source)).to_string());
    let statement_type_only = has_modifier(node, "type");

    if stmt.is_default {
        // `export default expr` carries a `value` field; `export = expr` does not
        stmt.default_value = node.child_by_field_name("value").or_else(|| {
            named_children(node)
                .into_iter()
                .find(|c| c.kind() != node_kinds::STRING)
        });
        if let Some(value) = stmt.default_value {
            let local_name = (value.kind() == node_kinds::IDENTIFIER)
                .then(|| node_text(&value, source).to_string());
            stmt.exports.push(ExportInfo {
                name: "default".to_string(),
                kind: ExportKind::Default,
                declared_kind: default_value_kind(&value),
                line,
                local_name,
                reexport: None,
            });
        }
        return stmt;
    }

    if let Some(clause) = find_child_by_kind(node, node_kinds::EXPORT_CLAUSE) {
        for spec in find_children_by_kind(&clause, node_kinds::EXPORT_SPECIFIER) {
            let Some(original) = field_name(&spec, source) else {
                continue;
            };
            let alias = spec
                .child_by_field_name("alias")
                .map(|a| strip_quotes(node_text(&a, source)).to_string());
            let name = alias.clone().unwrap_or_else(|| original.clone());
            let spec_type_only = statement_type_only || has_modifier(&spec, "type");

            let (local_name, reexport) = match &source_module {
                Some(module) => (
                    None,
                    Some(ReexportInfo {
                        source_module: module.clone(),
                        exported_name: original,
                        local_name: name.clone(),
                        is_type_only: spec_type_only,
                    }),
                ),
                None => (alias.map(|_| original), None),
            };

            stmt.exports.push(ExportInfo {
                kind: kind_for_name(&name),
                name,
                declared_kind: DeclaredKind::Unknown,
                line: node_line(&spec),
                local_name,
                reexport,
            });
        }
        return stmt;
    }

    // `export * from 'm'` / `export * as ns from 'm'`
    if let Some(module) = source_module {
        let namespace = find_child_by_kind(node, node_kinds::NAMESPACE_EXPORT).and_then(|ns| {
            named_children(&ns)
                .first()
                .map(|id| strip_quotes(node_text(id, source)).to_string())
        });
        let name = namespace.unwrap_or_else(|| "*".to_string());
        stmt.exports.push(ExportInfo {
            name: name.clone(),
            kind: ExportKind::Namespace,
            declared_kind: DeclaredKind::Namespace,
            line,
            local_name: None,
            reexport: Some(ReexportInfo {
                source_module: module,
                exported_name: "*".to_string(),
                local_name: name,
                is_type_only: statement_type_only,
            }),
        });
    }

    stmt
}

fn default_value_kind(value: &Node) -> DeclaredKind {
    match value.kind() {
        node_kinds::ARROW_FUNCTION
        | node_kinds::FUNCTION_EXPRESSION
        | node_kinds::FUNCTION
        | node_kinds::GENERATOR_FUNCTION => DeclaredKind::Function,
        node_kinds::CLASS => DeclaredKind::Class,
        node_kinds::IDENTIFIER => DeclaredKind::Unknown,
        _ => DeclaredKind::Variable,
    }
}
