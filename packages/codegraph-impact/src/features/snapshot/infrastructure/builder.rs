//! Snapshot builder
//!
//! Parses one version of a file and extracts its declarations, exports and
//! imports. Building never fails: unparseable input yields a degraded or
//! failed snapshot instead of an error.

use std::collections::HashSet;

use tracing::{debug, warn};
use tree_sitter::Node;

use crate::features::parsing::infrastructure::extractors::typescript::{
    export_for_declaration, extract_call_import, extract_class, extract_enum,
    extract_export_statement, extract_function_declaration, extract_import_statement,
    extract_interface, extract_type_alias, extract_variable_declaration,
};
use crate::features::parsing::infrastructure::extractors::typescript::function::extract_function_value;
use crate::features::parsing::infrastructure::tree_sitter::languages::typescript::{
    is_function_value, node_kinds,
};
use crate::features::parsing::TreeSitterParser;
use crate::features::snapshot::domain::{
    DeclaredKind, ExportInfo, ImportInfo, ParseStatus, SymbolInfo, SymbolKind, SymbolSnapshot,
};
use crate::shared::utils::tree_sitter::{
    count_error_nodes, extract_node_text, node_line, walk_preorder,
};

/// blake3 hex digest of a source text
pub fn content_hash(source: &str) -> String {
    blake3::hash(source.as_bytes()).to_hex().to_string()
}

/// Builds `SymbolSnapshot`s from source text
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotBuilder;

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a snapshot of `source` as the content of `file_path`
    pub fn build(&self, file_path: &str, source: &str) -> SymbolSnapshot {
        let hash = content_hash(source);

        let mut parser = match TreeSitterParser::for_path(file_path) {
            Ok(parser) => parser,
            Err(e) => {
                warn!(file = %file_path, error = %e, "parser unavailable");
                return SymbolSnapshot::empty(file_path, hash, ParseStatus::Failed);
            }
        };
        let Some(tree) = parser.parse(source) else {
            warn!(file = %file_path, "parser produced no tree");
            return SymbolSnapshot::empty(file_path, hash, ParseStatus::Failed);
        };

        let root = tree.root_node();
        let error_nodes = count_error_nodes(&root);
        let status = if error_nodes == 0 {
            ParseStatus::Clean
        } else {
            ParseStatus::Degraded { error_nodes }
        };

        let mut collector = Collector::new(source);
        for stmt in (0..root.named_child_count()).filter_map(|i| root.named_child(i)) {
            collector.visit_statement(&stmt);
        }
        collector.flush_overloads();
        collector.collect_imports(&root);

        let mut snapshot = SymbolSnapshot::empty(file_path, hash, status);
        collector.finish(&mut snapshot);

        debug!(
            file = %file_path,
            symbols = snapshot.symbol_count(),
            exports = snapshot.exports.len(),
            imports = snapshot.imports.len(),
            error_nodes,
            "snapshot built"
        );
        snapshot
    }
}

/// Overload signature waiting for its implementation
struct PendingOverload {
    info: SymbolInfo,
}

struct Collector<'s> {
    source: &'s str,
    functions: Vec<SymbolInfo>,
    classes: Vec<SymbolInfo>,
    interfaces: Vec<SymbolInfo>,
    type_aliases: Vec<SymbolInfo>,
    enums: Vec<SymbolInfo>,
    variables: HashSet<String>,
    exports: Vec<ExportInfo>,
    imports: Vec<ImportInfo>,
    pending_overloads: Vec<PendingOverload>,
}

impl<'s> Collector<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            functions: Vec::new(),
            classes: Vec::new(),
            interfaces: Vec::new(),
            type_aliases: Vec::new(),
            enums: Vec::new(),
            variables: HashSet::new(),
            exports: Vec::new(),
            imports: Vec::new(),
            pending_overloads: Vec::new(),
        }
    }

    fn visit_statement(&mut self, node: &Node) {
        if node.kind() == node_kinds::EXPORT_STATEMENT {
            self.visit_export(node);
        } else {
            self.collect_declaration(node, false, None);
        }
    }

    fn visit_export(&mut self, node: &Node) {
        let stmt = extract_export_statement(node, self.source);
        let line = node_line(node);
        self.exports.extend(stmt.exports);

        if let Some(decl) = stmt.declaration {
            self.collect_declaration(&decl, true, Some((line, stmt.is_default)));
        } else if let Some(value) = stmt.default_value {
            // `export default function () {}` / `export default class Named {}`
            let info = if is_function_value(value.kind()) {
                extract_function_declaration(&value, self.source, true)
            } else if value.kind() == node_kinds::CLASS {
                extract_class(&value, self.source, true)
            } else {
                None
            };
            if let Some(info) = info {
                if info.name != "default" {
                    if let Some(export) = self.exports.iter_mut().rev().find(|e| e.name == "default") {
                        export.local_name = Some(info.name.clone());
                    }
                }
                match info.kind {
                    SymbolKind::Class => self.classes.push(info),
                    _ => self.functions.push(info),
                }
            }
        }
    }

    /// Extract symbols from a declaration. `export` carries the statement line
    /// and default flag when the declaration is exported.
    fn collect_declaration(&mut self, node: &Node, is_exported: bool, export: Option<(u32, bool)>) {
        let source = self.source;
        let mut declared: Vec<(String, DeclaredKind)> = Vec::new();

        match node.kind() {
            node_kinds::FUNCTION_DECLARATION | node_kinds::GENERATOR_FUNCTION_DECLARATION => {
                if let Some(mut info) = extract_function_declaration(node, source, is_exported) {
                    info.overloads = self.take_overloads(&info.name);
                    declared.push((info.name.clone(), DeclaredKind::Function));
                    self.functions.push(info);
                }
            }
            node_kinds::FUNCTION_SIGNATURE => {
                if let Some(info) = extract_function_declaration(node, source, is_exported) {
                    // One export entry per name; later signatures dedupe below
                    declared.push((info.name.clone(), DeclaredKind::Function));
                    self.pending_overloads.push(PendingOverload { info });
                }
            }
            node_kinds::CLASS_DECLARATION | node_kinds::ABSTRACT_CLASS_DECLARATION => {
                if let Some(info) = extract_class(node, source, is_exported) {
                    declared.push((info.name.clone(), DeclaredKind::Class));
                    self.classes.push(info);
                }
            }
            node_kinds::INTERFACE_DECLARATION => {
                if let Some(info) = extract_interface(node, source, is_exported) {
                    declared.push((info.name.clone(), DeclaredKind::Interface));
                    self.interfaces.push(info);
                }
            }
            node_kinds::TYPE_ALIAS_DECLARATION => {
                if let Some(info) = extract_type_alias(node, source, is_exported) {
                    declared.push((info.name.clone(), DeclaredKind::Type));
                    self.type_aliases.push(info);
                }
            }
            node_kinds::ENUM_DECLARATION => {
                if let Some(info) = extract_enum(node, source, is_exported) {
                    declared.push((info.name.clone(), DeclaredKind::Enum));
                    self.enums.push(info);
                }
            }
            node_kinds::LEXICAL_DECLARATION | node_kinds::VARIABLE_DECLARATION => {
                let bindings = extract_variable_declaration(node, source, is_exported);
                for info in bindings.functions {
                    declared.push((info.name.clone(), DeclaredKind::Function));
                    self.functions.push(info);
                }
                for name in bindings.variables {
                    declared.push((name.clone(), DeclaredKind::Variable));
                    self.variables.insert(name);
                }
            }
            node_kinds::AMBIENT_DECLARATION => {
                // `declare function f(): void;`, `declare const x: T;`, ...
                for inner in (0..node.named_child_count()).filter_map(|i| node.named_child(i)) {
                    self.collect_declaration(&inner, is_exported, export);
                }
                return;
            }
            node_kinds::EXPRESSION_STATEMENT => {
                self.collect_commonjs_export(node);
            }
            _ => {}
        }

        if let Some((line, is_default)) = export {
            for (name, kind) in declared {
                self.exports
                    .push(export_for_declaration(&name, kind, line, is_default));
            }
        }
    }

    /// `module.exports.name = function (..) {}` / `exports.name = () => ..`
    fn collect_commonjs_export(&mut self, node: &Node) {
        let Some(assign) = node.named_child(0) else {
            return;
        };
        if assign.kind() != "assignment_expression" {
            return;
        }
        let (Some(left), Some(right)) = (
            assign.child_by_field_name("left"),
            assign.child_by_field_name("right"),
        ) else {
            return;
        };
        let target = extract_node_text(&left, self.source);
        let name = match target
            .strip_prefix("module.exports.")
            .or_else(|| target.strip_prefix("exports."))
        {
            Some(name) if !name.contains('.') => name.to_string(),
            _ => return,
        };
        if !is_function_value(right.kind()) {
            return;
        }
        if let Some(mut info) = extract_function_value("", &assign, &right, self.source, true)
        {
            info.name = name.clone();
            info.qualified_name = name.clone();
            self.exports.push(export_for_declaration(
                &name,
                DeclaredKind::Function,
                node_line(node),
                false,
            ));
            self.functions.push(info);
        }
    }

    /// Overload signatures of `name` preceding its implementation
    fn take_overloads(&mut self, name: &str) -> Vec<String> {
        let (matching, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_overloads)
            .into_iter()
            .partition(|p| p.info.name == name);
        self.pending_overloads = rest;
        matching.into_iter().map(|p| p.info.signature).collect()
    }

    /// Signatures without an implementation (ambient `.d.ts` style)
    fn flush_overloads(&mut self) {
        let pending = std::mem::take(&mut self.pending_overloads);
        let mut grouped: Vec<SymbolInfo> = Vec::new();
        for PendingOverload { info } in pending {
            match grouped.iter_mut().find(|g| g.name == info.name) {
                Some(group) => {
                    if group.overloads.is_empty() {
                        group.overloads.push(group.signature.clone());
                    }
                    group.overloads.push(info.signature);
                    group.is_exported |= info.is_exported;
                }
                None => grouped.push(info),
            }
        }
        self.functions.extend(grouped);
    }

    fn collect_imports(&mut self, root: &Node) {
        let source = self.source;
        let imports = &mut self.imports;
        walk_preorder(root, &mut |node| {
            if node.kind() == node_kinds::IMPORT_STATEMENT {
                imports.extend(extract_import_statement(&node, source));
                return false;
            }
            if let Some(info) = extract_call_import(&node, source) {
                imports.push(info);
            }
            true
        });
    }

    fn finish(mut self, snapshot: &mut SymbolSnapshot) {
        // Dedupe exports by (name, source); overloads export one name repeatedly
        let mut seen = HashSet::new();
        self.exports
            .retain(|e| seen.insert((e.name.clone(), e.source_module().map(str::to_string))));

        // Exports through a later clause (`function a() {}; export { a }`)
        let exported_locals: HashSet<String> = self
            .exports
            .iter()
            .filter(|e| e.reexport.is_none())
            .map(|e| e.local_name.clone().unwrap_or_else(|| e.name.clone()))
            .collect();

        for list in [
            &mut self.functions,
            &mut self.classes,
            &mut self.interfaces,
            &mut self.type_aliases,
            &mut self.enums,
        ] {
            for symbol in list.iter_mut() {
                if exported_locals.contains(&symbol.name) {
                    symbol.is_exported = true;
                }
            }
        }

        // Classify clause exports now that every local is known
        for export in self.exports.iter_mut() {
            if export.reexport.is_some() || export.declared_kind != DeclaredKind::Unknown {
                continue;
            }
            let local = export.local_name.clone().unwrap_or_else(|| export.name.clone());
            export.declared_kind = self
                .functions
                .iter()
                .chain(self.classes.iter())
                .chain(self.interfaces.iter())
                .chain(self.type_aliases.iter())
                .chain(self.enums.iter())
                .find(|s| s.name == local)
                .map(|s| DeclaredKind::from(s.kind))
                .unwrap_or_else(|| {
                    if self.variables.contains(&local) {
                        DeclaredKind::Variable
                    } else {
                        DeclaredKind::Unknown
                    }
                });
        }

        snapshot.functions = self.functions;
        snapshot.classes = self.classes;
        snapshot.interfaces = self.interfaces;
        snapshot.type_aliases = self.type_aliases;
        snapshot.enums = self.enums;
        snapshot.exports = self.exports;
        snapshot.imports = self.imports;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::snapshot::domain::{ExportKind, ImportKind};
    use pretty_assertions::assert_eq;

    fn build(code: &str) -> SymbolSnapshot {
        SnapshotBuilder::new().build("/project/src/mod.ts", code)
    }

    #[test]
    fn test_build_collects_all_categories() {
        let code = r#"import { helper } from './helper';
export function run(a: string): void {}
export class Service {}
export interface Options { verbose?: boolean }
export type Id = string;
export enum Mode { A, B }
const local = () => 1;
"#;
        let snap = build(code);
        assert_eq!(snap.parse_status, ParseStatus::Clean);
        assert_eq!(snap.functions.len(), 2);
        assert_eq!(snap.classes.len(), 1);
        assert_eq!(snap.interfaces.len(), 1);
        assert_eq!(snap.type_aliases.len(), 1);
        assert_eq!(snap.enums.len(), 1);
        assert_eq!(snap.exports.len(), 5);
        assert_eq!(snap.imports.len(), 1);
        assert!(!snap.find_symbol("local").unwrap().is_exported);
        assert_eq!(snap.find_symbol("run").unwrap().line, 2);
    }

    #[test]
    fn test_overloads_grouped_under_implementation() {
        let code = r#"export function parse(x: string): number;
export function parse(x: number): number;
export function parse(x: any): number { return 0; }
"#;
        let snap = build(code);
        assert_eq!(snap.functions.len(), 1);
        let parse = &snap.functions[0];
        assert_eq!(parse.overloads.len(), 2);
        assert_eq!(parse.overloads[0], "function parse(x:string):number");
        assert_eq!(snap.exports.len(), 1);
    }

    #[test]
    fn test_declare_only_overloads() {
        let code = "declare function f(a: string): void;\ndeclare function f(a: number): void;\n";
        let snap = build(code);
        assert_eq!(snap.functions.len(), 1);
        assert_eq!(snap.functions[0].overloads.len(), 2);
    }

    #[test]
    fn test_clause_export_marks_symbol_exported() {
        let code = "function a() {}\nconst v = 1;\nexport { a as b, v };\n";
        let snap = build(code);
        assert!(snap.find_symbol("a").unwrap().is_exported);
        assert_eq!(snap.exports[0].declared_kind, DeclaredKind::Function);
        assert_eq!(snap.exports[1].declared_kind, DeclaredKind::Variable);
    }

    #[test]
    fn test_default_exports() {
        let snap = build("export default class Widget {}\n");
        assert_eq!(snap.exports[0].kind, ExportKind::Default);
        assert_eq!(snap.exports[0].local_name.as_deref(), Some("Widget"));

        let snap = build("export default function () { return 1; }\n");
        assert_eq!(snap.functions[0].name, "default");
        assert_eq!(snap.exports[0].declared_kind, DeclaredKind::Function);
    }

    #[test]
    fn test_commonjs_function_export() {
        let snap = build("module.exports.greet = function (name) { return name; };\n");
        assert_eq!(snap.functions[0].name, "greet");
        assert_eq!(snap.exports[0].name, "greet");
    }

    #[test]
    fn test_degraded_on_syntax_error() {
        let snap = build("export function ok(a: string) {}\nexport function broken( {\n");
        assert!(matches!(snap.parse_status, ParseStatus::Degraded { .. }));
        assert!(snap.find_symbol("ok").is_some());
    }

    #[test]
    fn test_imports_in_source_order() {
        let code = "const a = require('./a');\nimport b from './b';\nconst c = import('./c');\n";
        let snap = build(code);
        let kinds: Vec<ImportKind> = snap.imports.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![ImportKind::Require, ImportKind::Static, ImportKind::Dynamic]);
    }

    #[test]
    fn test_content_hash_stable() {
        assert_eq!(content_hash("abc"), content_hash("abc"));
        assert_ne!(content_hash("abc"), content_hash("abd"));
    }
}
