//! Property tests for the snapshot differ
//!
//! - Self-diff: diffing a module against itself reports nothing
//! - Whitespace: re-spacing a module reports nothing
//! - Single edit: changing one parameter type yields exactly one type change

#[path = "../common/mod.rs"]
mod common;

use codegraph_impact::features::snapshot_diff::{ChangeType, RuleId};
use common::*;
use proptest::prelude::*;

const TYPES: &[&str] = &["string", "number", "boolean", "User", "string[]", "Promise<void>"];

#[derive(Debug, Clone)]
struct Param {
    optional: bool,
    ty: usize,
}

#[derive(Debug, Clone)]
enum Decl {
    Function { exported: bool, params: Vec<Param>, ret: usize },
    Interface { exported: bool, props: Vec<Param> },
    Alias { exported: bool, ty: usize },
    Enum { exported: bool, members: usize },
}

fn param() -> impl Strategy<Value = Param> {
    (any::<bool>(), 0..TYPES.len()).prop_map(|(optional, ty)| Param { optional, ty })
}

fn decl() -> impl Strategy<Value = Decl> {
    prop_oneof![
        (any::<bool>(), prop::collection::vec(param(), 0..4), 0..TYPES.len())
            .prop_map(|(exported, params, ret)| Decl::Function { exported, params, ret }),
        (any::<bool>(), prop::collection::vec(param(), 0..5))
            .prop_map(|(exported, props)| Decl::Interface { exported, props }),
        (any::<bool>(), 0..TYPES.len()).prop_map(|(exported, ty)| Decl::Alias { exported, ty }),
        (any::<bool>(), 1usize..4).prop_map(|(exported, members)| Decl::Enum { exported, members }),
    ]
}

fn params_text(params: &[Param], sep: &str) -> String {
    // Optional parameters may not precede required ones
    let mut seen_optional = false;
    params
        .iter()
        .enumerate()
        .map(|(i, p)| {
            seen_optional |= p.optional;
            let mark = if seen_optional { "?" } else { "" };
            format!("p{}{}:{}{}", i, mark, sep, TYPES[p.ty])
        })
        .collect::<Vec<_>>()
        .join(&format!(",{}", sep))
}

/// Render declarations; `sep` controls optional whitespace
fn render(decls: &[Decl], sep: &str) -> String {
    let mut out = String::new();
    for (i, d) in decls.iter().enumerate() {
        let export = |exported: bool| if exported { "export " } else { "" };
        let line = match d {
            Decl::Function { exported, params, ret } => format!(
                "{}function fn_{}({}){}:{}{} {{ return undefined as any; }}",
                export(*exported),
                i,
                params_text(params, sep),
                sep,
                sep,
                TYPES[*ret]
            ),
            Decl::Interface { exported, props } => {
                let body = props
                    .iter()
                    .enumerate()
                    .map(|(j, p)| {
                        let mark = if p.optional { "?" } else { "" };
                        format!("f{}{}:{}{};", j, mark, sep, TYPES[p.ty])
                    })
                    .collect::<Vec<_>>()
                    .join(sep);
                format!("{}interface Shape{} {{{}{}{}}}", export(*exported), i, sep, body, sep)
            }
            Decl::Alias { exported, ty } => {
                format!("{}type Alias{}{}={}{};", export(*exported), i, sep, sep, TYPES[*ty])
            }
            Decl::Enum { exported, members } => {
                let body = (0..*members)
                    .map(|m| format!("M{}", m))
                    .collect::<Vec<_>>()
                    .join(&format!(",{}", sep));
                format!("{}enum Kind{} {{{}{}{}}}", export(*exported), i, sep, body, sep)
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_self_diff_is_empty(decls in prop::collection::vec(decl(), 0..8)) {
        let source = render(&decls, " ");
        let diff = diff_sources(&source, &source);
        prop_assert!(diff.changed_symbols.is_empty());
        prop_assert!(diff.export_changes.is_empty());
        prop_assert!(diff.impacted_names.is_empty());
    }

    #[test]
    fn prop_whitespace_is_not_a_change(decls in prop::collection::vec(decl(), 0..8)) {
        let compact = render(&decls, "");
        let spaced = render(&decls, "  ");
        let diff = diff_sources(&compact, &spaced);
        prop_assert!(diff.changed_symbols.is_empty(), "{:?}", diff.changed_symbols);
        prop_assert!(diff.export_changes.is_empty());
    }

    #[test]
    fn prop_single_param_type_edit(
        params in prop::collection::vec((0..TYPES.len()).prop_map(|ty| Param { optional: false, ty }), 1..4),
        target in any::<prop::sample::Index>(),
    ) {
        let before = vec![Decl::Function { exported: true, params: params.clone(), ret: 0 }];
        let mut edited = params;
        let idx = target.index(edited.len());
        edited[idx].ty = (edited[idx].ty + 1) % TYPES.len();
        let after = vec![Decl::Function { exported: true, params: edited, ret: 0 }];

        let diff = diff_sources(&render(&before, " "), &render(&after, " "));
        prop_assert_eq!(diff.changed_symbols.len(), 1);
        prop_assert_eq!(diff.changed_symbols[0].change_type, ChangeType::TypeChanged);
        prop_assert_eq!(diff.changed_symbols[0].rule_id, RuleId::ParamType);
    }
}
