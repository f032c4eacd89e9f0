//! TypeScript Class Extractor
//!
//! Extracts class metadata from TypeScript AST:
//! - Class name, extends, implements
//! - Abstract classes
//! - Public/protected members (methods, constructor, accessors, fields)
//!
//! `private` and `#private` members never reach consumers and are skipped.

use tree_sitter::Node;

use super::common::*;
use super::function::{parameters_of, render_parameters, return_type_of};
use super::r#type::{extract_type_annotation, type_text};
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::node_kinds;
use crate::features::snapshot::domain::{
    ClassMember, ClassMemberKind, SymbolDetail, SymbolInfo, SymbolKind,
};
use crate::shared::utils::text::normalize_type_text;
use crate::shared::utils::tree_sitter::node_line;

/// Extract a class declaration (or a class expression under `export default`)
pub fn extract_class(node: &Node, source: &str, is_exported: bool) -> Option<SymbolInfo> {
    let name = field_name(node, source).unwrap_or_else(|| "default".to_string());

    let heritage = find_child_by_kind(node, node_kinds::CLASS_HERITAGE);
    let extends = heritage
        .as_ref()
        .and_then(|h| find_child_by_kind(h, node_kinds::EXTENDS_CLAUSE))
        .map(|clause| extract_extends(&clause, source));
    let implements = heritage
        .as_ref()
        .and_then(|h| find_child_by_kind(h, node_kinds::IMPLEMENTS_CLAUSE))
        .map(|clause| {
            named_children(&clause)
                .iter()
                .map(|t| type_text(t, source))
                .collect()
        })
        .unwrap_or_default();

    let members = node
        .child_by_field_name("body")
        .map(|body| extract_members(&body, source))
        .unwrap_or_default();

    let member_sigs: Vec<String> = members.iter().map(render_member).collect();
    let signature = normalize_type_text(&format!(
        "{}{{{}}}",
        declaration_head(node, source),
        member_sigs.join(";")
    ));

    let constructor_params = members
        .iter()
        .find(|m| m.kind == ClassMemberKind::Constructor)
        .map(|m| m.parameters.clone())
        .unwrap_or_default();

    Some(SymbolInfo {
        qualified_name: name.clone(),
        name,
        kind: SymbolKind::Class,
        signature,
        return_type: None,
        parameters: constructor_params,
        is_exported,
        overloads: Vec::new(),
        line: node_line(node),
        detail: SymbolDetail::Class {
            extends,
            implements,
            is_abstract: node.kind() == node_kinds::ABSTRACT_CLASS_DECLARATION
                || is_abstract(node),
            members,
        },
    })
}

/// `extends Base<T>` yields `Base<T>`
fn extract_extends(clause: &Node, source: &str) -> String {
    let text = normalize_type_text(&text_without_comments(clause, source));
    text.strip_prefix("extends")
        .map(|rest| rest.trim().to_string())
        .unwrap_or(text)
}

fn extract_members(body: &Node, source: &str) -> Vec<ClassMember> {
    let mut members: Vec<ClassMember> = Vec::new();

    for node in named_children(body) {
        if is_private_member(&node, source) {
            continue;
        }
        let member = match node.kind() {
            node_kinds::METHOD_DEFINITION
            | node_kinds::METHOD_SIGNATURE
            | node_kinds::ABSTRACT_METHOD_SIGNATURE => extract_method(&node, source),
            node_kinds::PUBLIC_FIELD_DEFINITION => extract_field(&node, source),
            _ => None,
        };
        let Some(member) = member else { continue };

        // Overload signatures collapse into the implementation that follows them
        if let Some(existing) = members.iter_mut().find(|m| m.key() == member.key()) {
            *existing = member;
        } else {
            members.push(member);
        }
    }

    members
}

fn extract_method(node: &Node, source: &str) -> Option<ClassMember> {
    let name = field_name(node, source)?;
    let kind = if name == "constructor" {
        ClassMemberKind::Constructor
    } else if has_modifier(node, "get") {
        ClassMemberKind::Getter
    } else if has_modifier(node, "set") {
        ClassMemberKind::Setter
    } else {
        ClassMemberKind::Method
    };

    Some(ClassMember {
        name,
        kind,
        parameters: parameters_of(node, source),
        return_type: return_type_of(node, source),
        type_text: None,
        is_static: is_static(node),
        is_optional: is_optional_member(node),
        is_readonly: false,
    })
}

fn extract_field(node: &Node, source: &str) -> Option<ClassMember> {
    let name = field_name(node, source)?;
    let type_text = node
        .child_by_field_name("type")
        .or_else(|| find_child_by_kind(node, node_kinds::TYPE_ANNOTATION))
        .and_then(|t| extract_type_annotation(&t, source));

    Some(ClassMember {
        name,
        kind: ClassMemberKind::Property,
        parameters: Vec::new(),
        return_type: None,
        type_text,
        is_static: is_static(node),
        is_optional: is_optional_member(node),
        is_readonly: is_readonly(node),
    })
}

/// Compact member signature used inside the class signature
pub fn render_member(member: &ClassMember) -> String {
    let mut out = String::new();
    if member.is_static {
        out.push_str("static ");
    }
    if member.is_readonly {
        out.push_str("readonly ");
    }
    match member.kind {
        ClassMemberKind::Getter => out.push_str("get "),
        ClassMemberKind::Setter => out.push_str("set "),
        _ => {}
    }
    out.push_str(&member.name);
    if member.is_optional {
        out.push('?');
    }
    match member.kind {
        ClassMemberKind::Property => {
            if let Some(ty) = &member.type_text {
                out.push(':');
                out.push_str(ty);
            }
        }
        _ => {
            out.push_str(&render_parameters(&member.parameters));
            if let Some(ret) = &member.return_type {
                out.push(':');
                out.push_str(ret);
            }
        }
    }
    out
}
