//! Snapshot builder integration tests
//!
//! Builds snapshots from realistic module sources and checks the extracted
//! declarations, exports and imports.

#[path = "../common/mod.rs"]
mod common;

use codegraph_impact::features::snapshot::{
    DeclaredKind, ExportKind, ImportKind, ParseStatus, SymbolDetail, SymbolKind,
};
use codegraph_impact::SnapshotBuilder;
use common::*;
use pretty_assertions::assert_eq;

const SERVICE_MODULE: &str = r#"import { Logger } from './logger';
import * as http from 'http';

export interface RequestOptions {
  url: string;
  timeout?: number;
  [header: string]: unknown;
}

export type Handler = (req: RequestOptions) => Promise<void>;

export enum Method { Get, Post }

export abstract class Client {
  private secret = 'x';
  #token = '';
  constructor(protected logger: Logger) {}
  abstract send(opts: RequestOptions): Promise<void>;
  get name(): string { return 'client'; }
}

export const fetchAll = async (urls: string[]): Promise<void> => {};

function internal(a: number) { return a; }
"#;

#[test]
fn test_service_module_categories() {
    let snap = snapshot(SERVICE_MODULE);
    assert_eq!(snap.parse_status, ParseStatus::Clean);

    let functions: Vec<&str> = snap.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(functions, vec!["fetchAll", "internal"]);
    assert_eq!(snap.classes.len(), 1);
    assert_eq!(snap.interfaces.len(), 1);
    assert_eq!(snap.type_aliases.len(), 1);
    assert_eq!(snap.enums.len(), 1);

    assert!(snap.find_symbol("fetchAll").unwrap().is_exported);
    assert!(!snap.find_symbol("internal").unwrap().is_exported);
}

#[test]
fn test_declaration_lines_are_one_based() {
    let snap = snapshot(SERVICE_MODULE);
    assert_eq!(snap.find_symbol("RequestOptions").unwrap().line, 4);
    assert_eq!(snap.find_symbol("Handler").unwrap().line, 10);
    assert_eq!(snap.find_symbol("Client").unwrap().line, 14);
    assert_eq!(snap.imports[0].line, 1);
}

#[test]
fn test_interface_shape() {
    let snap = snapshot(SERVICE_MODULE);
    let iface = snap.find_symbol("RequestOptions").unwrap();
    assert_eq!(iface.kind, SymbolKind::Interface);

    let shape = iface.detail.shape().expect("interface shape");
    assert_eq!(shape.properties.len(), 2);
    assert!(shape.property("timeout").unwrap().is_optional);
    assert!(!shape.property("url").unwrap().is_optional);
    assert!(shape.index_signature.is_some());
}

#[test]
fn test_class_skips_private_members() {
    let snap = snapshot(SERVICE_MODULE);
    let class = snap.find_symbol("Client").unwrap();
    match &class.detail {
        SymbolDetail::Class {
            is_abstract,
            members,
            ..
        } => {
            assert!(*is_abstract);
            let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
            assert!(!names.contains(&"secret"));
            assert!(!names.iter().any(|n| n.contains("token")));
            assert!(names.contains(&"send"));
            assert!(names.contains(&"name"));
        }
        other => panic!("expected class detail, got {:?}", other),
    }
}

#[test]
fn test_export_forms() {
    let code = r#"export { parse as parseConfig } from './parser';
export type { Options } from './options';
export * from './utils';
export * as fs from './fs';
function local() {}
export { local as helper };
export default class App {}
"#;
    let snap = snapshot(code);
    let names: Vec<&str> = snap.exports.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["parseConfig", "Options", "*", "fs", "helper", "default"]
    );

    let aliased = &snap.exports[0];
    assert_eq!(aliased.source_module(), Some("./parser"));
    assert_eq!(aliased.reexport.as_ref().unwrap().exported_name, "parse");
    assert!(snap.exports[1].reexport.as_ref().unwrap().is_type_only);
    assert!(snap.exports[2].is_star());
    assert_eq!(snap.exports[3].kind, ExportKind::Namespace);

    assert_eq!(snap.exports[4].local_name.as_deref(), Some("local"));
    assert_eq!(snap.exports[4].declared_kind, DeclaredKind::Function);
    assert_eq!(snap.exported_names_of("local"), vec!["helper".to_string()]);

    assert_eq!(snap.exports[5].kind, ExportKind::Default);
    assert_eq!(snap.exports[5].declared_kind, DeclaredKind::Class);
}

#[test]
fn test_import_forms() {
    let code = r#"import React, { useState } from 'react';
import './styles';
import fs = require('fs');
const path = require('path');
export async function lazy() { return import('./lazy'); }
"#;
    let snap = snapshot(code);
    let kinds: Vec<ImportKind> = snap.imports.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ImportKind::Static,
            ImportKind::SideEffect,
            ImportKind::Require,
            ImportKind::Require,
            ImportKind::Dynamic,
        ]
    );
    assert_eq!(snap.imports[0].bindings.len(), 2);
    assert!(snap.imports[1].bindings.is_empty());
    assert_eq!(snap.imports[4].module_specifier, "./lazy");
}

#[test]
fn test_reformatting_does_not_change_signatures() {
    let compact = "export function run(a: string, b?: number): void {}\n";
    let spread = "export function run(\n  a:  string,\n  b ?: number,\n): void {\n}\n";
    let before = snapshot(compact);
    let after = snapshot(spread);
    assert_eq!(before.functions[0].signature, after.functions[0].signature);
    assert!(!before.functions[0].signature.contains("export"));
    assert_no_changes(&diff_sources(compact, spread));
}

#[test]
fn test_broken_source_degrades() {
    let snap = snapshot("export function ok(): void {}\nexport class {\n");
    assert!(matches!(snap.parse_status, ParseStatus::Degraded { .. }));
    assert!(snap.find_symbol("ok").is_some());
}

#[test]
fn test_tsx_path_uses_tsx_grammar() {
    let code = "export function View(props: { title: string }) { return <div>{props.title}</div>; }\n";
    let snap = SnapshotBuilder::new().build("src/View.tsx", code);
    assert_eq!(snap.parse_status, ParseStatus::Clean);
    assert_eq!(snap.functions[0].name, "View");
}

#[test]
fn test_content_hash_tracks_source() {
    let a = snapshot("export const a = () => 1;\n");
    let b = snapshot("export const a = () => 1;\n");
    let c = snapshot("export const a = () => 2;\n");
    assert_eq!(a.content_hash, b.content_hash);
    assert_ne!(a.content_hash, c.content_hash);
}
