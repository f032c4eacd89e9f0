//! Snapshot differ integration tests
//!
//! Each case diffs two versions of one module and checks the rule that fired,
//! the change type, and the export comparison.

#[path = "../common/mod.rs"]
mod common;

use codegraph_impact::features::snapshot_diff::{ChangeType, RuleId, Severity};
use common::*;
use pretty_assertions::assert_eq;

#[test]
fn test_self_diff_is_empty() {
    let code = fixture_module(3);
    let diff = diff_sources(&code, &code);
    assert_no_changes(&diff);
    assert!(diff.impacted_names.is_empty());
    assert!(!diff.has_breaking_changes());
}

#[test]
fn test_dropping_export_from_interface() {
    let diff = diff_sources(
        "export interface Config { name: string }\n",
        "interface Config { name: string }\n",
    );
    assert!(diff.changed_symbols.is_empty());
    assert_eq!(diff.export_changes.removed.len(), 1);
    assert_eq!(diff.export_changes.removed[0].name, "Config");
    assert!(diff.export_changes.added.is_empty());
    assert!(diff.has_breaking_changes());
}

#[test]
fn test_optional_param_becomes_required() {
    let diff = diff_sources(
        "export function connect(host: string, port?: number): void {}\n",
        "export function connect(host: string, port: number): void {}\n",
    );
    assert_single_change_of(&diff, ChangeType::SignatureChanged, RuleId::ParamRequired);
    assert_eq!(diff.changed_symbols[0].severity, Severity::High);
}

#[test]
fn test_param_type_only_edit() {
    let diff = diff_sources(
        "export function connect(host: string, port: number): void {}\n",
        "export function connect(host: string, port: string): void {}\n",
    );
    assert_single_change_of(&diff, ChangeType::TypeChanged, RuleId::ParamType);
    assert_eq!(diff.changed_symbols[0].severity, Severity::Medium);
}

#[test]
fn test_return_type_only_edit() {
    let diff = diff_sources(
        "export function load(id: string): Promise<User> { return fetch(id); }\n",
        "export function load(id: string): Promise<User | null> { return fetch(id); }\n",
    );
    assert_single_change_of(&diff, ChangeType::TypeChanged, RuleId::ReturnType);
}

#[test]
fn test_default_value_edit_is_not_a_change() {
    let diff = diff_sources(
        "export function retry(times = 1, delayMs: number = 100): void {}\n",
        "export function retry(times = 3, delayMs: number = 250): void {}\n",
    );
    assert_no_changes(&diff);

    // Dropping the default makes the parameter required
    let diff = diff_sources(
        "export function retry(times = 1): void {}\n",
        "export function retry(times: number): void {}\n",
    );
    assert_single_change_of(&diff, ChangeType::SignatureChanged, RuleId::ParamRequired);
}

#[test]
fn test_param_count_change() {
    let diff = diff_sources(
        "export const send = (msg: string) => {};\n",
        "export const send = (msg: string, urgent: boolean) => {};\n",
    );
    assert_single_change_of(&diff, ChangeType::SignatureChanged, RuleId::ParamCount);
}

#[test]
fn test_overload_rule_wins_over_param_type() {
    let before = r#"export function parse(x: string): number;
export function parse(x: any): number { return 0; }
"#;
    let after = r#"export function parse(x: string): number;
export function parse(x: number): number;
export function parse(x: unknown): number { return 0; }
"#;
    let diff = diff_sources(before, after);
    assert_single_change_of(&diff, ChangeType::SignatureChanged, RuleId::OverloadSet);
}

#[test]
fn test_interface_property_rules() {
    let diff = diff_sources(
        "export interface User { id: string; email?: string }\n",
        "export interface User { id: string }\n",
    );
    assert_single_change_of(&diff, ChangeType::SignatureChanged, RuleId::PropertyRemoved);

    let diff = diff_sources(
        "export interface User { id: string; email?: string }\n",
        "export interface User { id: string; email: string }\n",
    );
    assert_single_change_of(&diff, ChangeType::SignatureChanged, RuleId::PropertyRequired);

    let diff = diff_sources(
        "export interface User { id: string }\n",
        "export interface User { id: number }\n",
    );
    assert_single_change_of(&diff, ChangeType::TypeChanged, RuleId::PropertyType);
}

#[test]
fn test_index_signature_rules() {
    let diff = diff_sources(
        "export interface Bag { [key: string]: number }\n",
        "export interface Bag { size: number }\n",
    );
    assert_single_change_of(&diff, ChangeType::SignatureChanged, RuleId::IndexSignatureRemoved);

    let diff = diff_sources(
        "export interface Bag { [key: string]: number }\n",
        "export interface Bag { [key: string]: string }\n",
    );
    assert_single_change_of(&diff, ChangeType::TypeChanged, RuleId::IndexSignature);
}

#[test]
fn test_interface_method_signature() {
    let diff = diff_sources(
        "export interface Store { get(key: string): string }\n",
        "export interface Store { get(key: string, fallback: string): string }\n",
    );
    assert_single_change_of(&diff, ChangeType::SignatureChanged, RuleId::MethodSignature);
}

#[test]
fn test_function_type_alias_call_signature() {
    let diff = diff_sources(
        "export type Handler = (req: Request) => void;\n",
        "export type Handler = (req: Request) => Promise<void>;\n",
    );
    assert_single_change_of(&diff, ChangeType::TypeChanged, RuleId::CallSignature);
}

#[test]
fn test_class_method_rules() {
    let before = r#"export class Repo {
  find(id: string): Item { return load(id); }
  save(item: Item): void {}
}
"#;
    let removed = r#"export class Repo {
  find(id: string): Item { return load(id); }
}
"#;
    let diff = diff_sources(before, removed);
    assert_single_change_of(&diff, ChangeType::SignatureChanged, RuleId::ClassMethodRemoved);

    let retyped = r#"export class Repo {
  find(id: string): Item | undefined { return load(id); }
  save(item: Item): void {}
}
"#;
    let diff = diff_sources(before, retyped);
    let change = assert_single_change_of(&diff, ChangeType::TypeChanged, RuleId::ClassMethodReturn);
    let after = change.after.as_ref().unwrap();
    assert_eq!(change.symbol, after.qualified_name);
    assert_eq!(change.symbol, "Repo");
}

#[test]
fn test_removed_export_is_critical_and_consolidated() {
    let diff = diff_sources(
        "export function a() {}\nexport function b() {}\n",
        "export function a() {}\n",
    );
    let change = assert_single_change(&diff);
    assert_eq!(change.change_type, ChangeType::Removed);
    assert_eq!(change.severity, Severity::Critical);
    assert_eq!(diff.export_changes.removed.len(), 1);
    assert!(diff.consolidated_changes().is_empty());
    assert_eq!(diff.impacted_names, names(&["b"]));
}

#[test]
fn test_added_export_is_not_breaking() {
    let diff = diff_sources("export function a() {}\n", "export function a() {}\nexport function b() {}\n");
    let change = assert_single_change(&diff);
    assert_eq!(change.change_type, ChangeType::Added);
    assert_eq!(change.severity, Severity::Low);
    assert!(!diff.has_breaking_changes());
    assert!(diff.impacted_names.is_empty());
}

#[test]
fn test_moved_reexport_is_modified() {
    let diff = diff_sources(
        "export { parse } from './v1/parser';\n",
        "export { parse } from './v2/parser';\n",
    );
    assert!(diff.export_changes.added.is_empty());
    assert!(diff.export_changes.removed.is_empty());
    assert_eq!(diff.export_changes.modified.len(), 1);
    assert!(diff.has_breaking_changes());
}

#[test]
fn test_rename_is_a_hint_only() {
    let diff = diff_sources(
        "export function loadUser(id: string): User { return get(id); }\n",
        "export function fetchUser(id: string): User { return get(id); }\n",
    );
    let kinds: Vec<ChangeType> = diff.changed_symbols.iter().map(|c| c.change_type).collect();
    assert_eq!(kinds, vec![ChangeType::Removed, ChangeType::Added]);
    assert_eq!(diff.rename_hints.len(), 1);
    assert_eq!(diff.rename_hints[0].from, "loadUser");
    assert_eq!(diff.rename_hints[0].to, "fetchUser");
}

#[test]
fn test_diff_serializes_to_json() {
    let diff = diff_sources(
        "export function f(a?: string) {}\n",
        "export function f(a: string) {}\n",
    );
    let json = serde_json::to_value(&diff).unwrap();
    assert_eq!(json["changed_symbols"][0]["change_type"], "signature-changed");
    assert_eq!(json["changed_symbols"][0]["rule_id"], "param-required");
    assert_eq!(json["changed_symbols"][0]["severity"], "high");
}
