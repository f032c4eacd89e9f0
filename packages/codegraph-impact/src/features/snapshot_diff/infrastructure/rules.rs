//! Rule cascade for modified symbols
//!
//! Rules run in a fixed order and the first match classifies the change, so a
//! symbol never produces more than one change record.
//!
//! 1. overload set
//! 2. parameters, then return type (functions, unshaped type aliases)
//! 3. shape members (interfaces, object/function type aliases)
//! 4. class members
//! 5. signature text, then return text

use std::collections::BTreeSet;

use crate::features::snapshot::domain::{
    ClassMember, ParameterInfo, ShapeDetail, SymbolDetail, SymbolInfo, SymbolKind,
};
use crate::features::snapshot_diff::domain::{ChangeType, RuleId};

/// Result of running the cascade on one symbol pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule_id: RuleId,
    pub change_type: ChangeType,
    pub message: String,
}

impl RuleMatch {
    fn new(rule_id: RuleId, change_type: ChangeType, message: impl Into<String>) -> Self {
        Self {
            rule_id,
            change_type,
            message: message.into(),
        }
    }
}

/// Classify a symbol present in both snapshots with differing structure
pub fn classify_modification(before: &SymbolInfo, after: &SymbolInfo) -> RuleMatch {
    overload_rule(before, after)
        .or_else(|| match (&before.detail, &after.detail) {
            (SymbolDetail::Function { .. }, SymbolDetail::Function { .. }) => {
                parameter_rules(&before.name, &before.parameters, &after.parameters)
                    .or_else(|| return_type_rule(before, after))
            }
            (SymbolDetail::Class { members: b, .. }, SymbolDetail::Class { members: a, .. }) => {
                class_rules(&before.name, b, a)
            }
            (SymbolDetail::TypeAlias { shape: Some(b), .. }, SymbolDetail::TypeAlias { shape: Some(a), .. })
            | (SymbolDetail::Interface(b), SymbolDetail::Interface(a)) => {
                shape_rules(&before.name, b, a)
            }
            (SymbolDetail::TypeAlias { .. }, SymbolDetail::TypeAlias { .. }) => {
                return_type_rule(before, after)
            }
            _ => None,
        })
        .unwrap_or_else(|| fallback_rule(before, after))
}

fn describe(ty: &Option<String>) -> &str {
    ty.as_deref().unwrap_or("<none>")
}

// ═══════════════════════════════════════════════════════════════════════════
// 1. Overloads
// ═══════════════════════════════════════════════════════════════════════════

fn overload_rule(before: &SymbolInfo, after: &SymbolInfo) -> Option<RuleMatch> {
    if before.overloads.len() != after.overloads.len() {
        return Some(RuleMatch::new(
            RuleId::OverloadSet,
            ChangeType::SignatureChanged,
            format!(
                "overload count of '{}' changed from {} to {}",
                before.name,
                before.overloads.len(),
                after.overloads.len()
            ),
        ));
    }
    let b: BTreeSet<&String> = before.overloads.iter().collect();
    let a: BTreeSet<&String> = after.overloads.iter().collect();
    (b != a).then(|| {
        RuleMatch::new(
            RuleId::OverloadSet,
            ChangeType::SignatureChanged,
            format!("overload signatures of '{}' changed", before.name),
        )
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// 2. Parameters and return type
// ═══════════════════════════════════════════════════════════════════════════

/// Parameter part of the cascade, reused by call signatures, interface
/// methods and class methods. `owner` names the callable in messages.
pub fn parameter_rules(
    owner: &str,
    before: &[ParameterInfo],
    after: &[ParameterInfo],
) -> Option<RuleMatch> {
    if before.len() != after.len() {
        return Some(RuleMatch::new(
            RuleId::ParamCount,
            ChangeType::SignatureChanged,
            format!(
                "parameter count of '{}' changed from {} to {}",
                owner,
                before.len(),
                after.len()
            ),
        ));
    }
    if let Some((b, _)) = before
        .iter()
        .zip(after)
        .find(|(b, a)| b.is_rest != a.is_rest)
    {
        return Some(RuleMatch::new(
            RuleId::ParamCount,
            ChangeType::SignatureChanged,
            format!("rest parameter '{}' of '{}' changed", b.name, owner),
        ));
    }
    if let Some(missing) = before
        .iter()
        .find(|b| !after.iter().any(|a| a.name == b.name))
    {
        return Some(RuleMatch::new(
            RuleId::ParamRemoved,
            ChangeType::SignatureChanged,
            format!("parameter '{}' of '{}' removed", missing.name, owner),
        ));
    }
    if let Some((b, _)) = before
        .iter()
        .zip(after)
        .find(|(b, a)| b.is_optional && !a.is_optional)
    {
        return Some(RuleMatch::new(
            RuleId::ParamRequired,
            ChangeType::SignatureChanged,
            format!("parameter '{}' of '{}' is now required", b.name, owner),
        ));
    }
    before
        .iter()
        .zip(after)
        .find(|(b, a)| b.type_annotation != a.type_annotation)
        .map(|(b, a)| {
            RuleMatch::new(
                RuleId::ParamType,
                ChangeType::TypeChanged,
                format!(
                    "parameter '{}' of '{}' changed type from {} to {}",
                    b.name,
                    owner,
                    describe(&b.type_annotation),
                    describe(&a.type_annotation)
                ),
            )
        })
}

fn return_type_rule(before: &SymbolInfo, after: &SymbolInfo) -> Option<RuleMatch> {
    (before.return_type != after.return_type).then(|| {
        let what = if before.kind == SymbolKind::Type {
            "type"
        } else {
            "return type"
        };
        RuleMatch::new(
            RuleId::ReturnType,
            ChangeType::TypeChanged,
            format!(
                "{} of '{}' changed from {} to {}",
                what,
                before.name,
                describe(&before.return_type),
                describe(&after.return_type)
            ),
        )
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// 3. Shapes (interfaces, object/function type aliases)
// ═══════════════════════════════════════════════════════════════════════════

fn shape_rules(owner: &str, before: &ShapeDetail, after: &ShapeDetail) -> Option<RuleMatch> {
    call_signature_rule(owner, before, after)
        .or_else(|| index_signature_rule(owner, before, after))
        .or_else(|| property_rules(owner, before, after))
        .or_else(|| method_rules(owner, before, after))
}

fn call_signature_rule(owner: &str, before: &ShapeDetail, after: &ShapeDetail) -> Option<RuleMatch> {
    match (&before.call_signature, &after.call_signature) {
        (Some(_), None) => Some(RuleMatch::new(
            RuleId::CallSignature,
            ChangeType::SignatureChanged,
            format!("call signature of '{}' removed", owner),
        )),
        (None, Some(_)) => Some(RuleMatch::new(
            RuleId::CallSignature,
            ChangeType::SignatureChanged,
            format!("call signature added to '{}'", owner),
        )),
        (Some(b), Some(a)) => parameter_rules(owner, &b.parameters, &a.parameters)
            .map(|m| RuleMatch::new(RuleId::CallSignature, m.change_type, m.message))
            .or_else(|| {
                (b.return_type != a.return_type).then(|| {
                    RuleMatch::new(
                        RuleId::CallSignature,
                        ChangeType::TypeChanged,
                        format!(
                            "call signature return type of '{}' changed from {} to {}",
                            owner,
                            describe(&b.return_type),
                            describe(&a.return_type)
                        ),
                    )
                })
            }),
        (None, None) => None,
    }
}

fn index_signature_rule(owner: &str, before: &ShapeDetail, after: &ShapeDetail) -> Option<RuleMatch> {
    match (&before.index_signature, &after.index_signature) {
        (Some(_), None) => Some(RuleMatch::new(
            RuleId::IndexSignatureRemoved,
            ChangeType::SignatureChanged,
            format!("index signature of '{}' removed", owner),
        )),
        (None, Some(_)) => Some(RuleMatch::new(
            RuleId::IndexSignature,
            ChangeType::TypeChanged,
            format!("index signature added to '{}'", owner),
        )),
        (Some(b), Some(a)) if b != a => Some(RuleMatch::new(
            RuleId::IndexSignature,
            ChangeType::TypeChanged,
            format!("index signature of '{}' changed", owner),
        )),
        _ => None,
    }
}

fn property_rules(owner: &str, before: &ShapeDetail, after: &ShapeDetail) -> Option<RuleMatch> {
    if let Some(removed) = before.properties.iter().find(|p| after.property(&p.name).is_none()) {
        return Some(RuleMatch::new(
            RuleId::PropertyRemoved,
            ChangeType::SignatureChanged,
            format!("property '{}.{}' removed", owner, removed.name),
        ));
    }

    let pairs: Vec<_> = before
        .properties
        .iter()
        .filter_map(|b| after.property(&b.name).map(|a| (b, a)))
        .collect();

    if let Some((b, _)) = pairs.iter().find(|(b, a)| b.is_optional && !a.is_optional) {
        return Some(RuleMatch::new(
            RuleId::PropertyRequired,
            ChangeType::SignatureChanged,
            format!("property '{}.{}' is now required", owner, b.name),
        ));
    }
    pairs
        .iter()
        .find(|(b, a)| b.type_text != a.type_text)
        .map(|(b, a)| {
            RuleMatch::new(
                RuleId::PropertyType,
                ChangeType::TypeChanged,
                format!(
                    "property '{}.{}' changed type from {} to {}",
                    owner,
                    b.name,
                    describe(&b.type_text),
                    describe(&a.type_text)
                ),
            )
        })
}

fn method_rules(owner: &str, before: &ShapeDetail, after: &ShapeDetail) -> Option<RuleMatch> {
    if let Some(removed) = before.methods.iter().find(|m| after.method(&m.name).is_none()) {
        return Some(RuleMatch::new(
            RuleId::MethodSignature,
            ChangeType::SignatureChanged,
            format!("method '{}.{}' removed", owner, removed.name),
        ));
    }

    let pairs: Vec<_> = before
        .methods
        .iter()
        .filter_map(|b| after.method(&b.name).map(|a| (b, a)))
        .collect();

    for (b, a) in &pairs {
        let qualified = format!("{}.{}", owner, b.name);
        if let Some(m) = parameter_rules(&qualified, &b.parameters, &a.parameters) {
            return Some(RuleMatch::new(RuleId::MethodSignature, m.change_type, m.message));
        }
    }
    pairs
        .iter()
        .find(|(b, a)| b.return_type != a.return_type)
        .map(|(b, a)| {
            RuleMatch::new(
                RuleId::MethodSignature,
                ChangeType::TypeChanged,
                format!(
                    "return type of '{}.{}' changed from {} to {}",
                    owner,
                    b.name,
                    describe(&b.return_type),
                    describe(&a.return_type)
                ),
            )
        })
}

// ═══════════════════════════════════════════════════════════════════════════
// 4. Class members
// ═══════════════════════════════════════════════════════════════════════════

fn class_rules(owner: &str, before: &[ClassMember], after: &[ClassMember]) -> Option<RuleMatch> {
    let find = |m: &ClassMember| after.iter().find(|a| a.key() == m.key());

    if let Some(removed) = before.iter().find(|m| find(m).is_none()) {
        return Some(RuleMatch::new(
            RuleId::ClassMethodRemoved,
            ChangeType::SignatureChanged,
            format!("member '{}.{}' removed", owner, removed.name),
        ));
    }

    let pairs: Vec<(&ClassMember, &ClassMember)> =
        before.iter().filter_map(|b| find(b).map(|a| (b, a))).collect();

    for (b, a) in pairs.iter().filter(|(b, _)| b.is_callable()) {
        let qualified = format!("{}.{}", owner, b.name);
        if let Some(m) = parameter_rules(&qualified, &b.parameters, &a.parameters) {
            return Some(RuleMatch::new(RuleId::ClassMethodParams, m.change_type, m.message));
        }
    }

    pairs
        .iter()
        .find(|(b, a)| b.return_type != a.return_type || b.type_text != a.type_text)
        .map(|(b, a)| {
            let (from, to) = if b.is_callable() || b.return_type.is_some() {
                (&b.return_type, &a.return_type)
            } else {
                (&b.type_text, &a.type_text)
            };
            RuleMatch::new(
                RuleId::ClassMethodReturn,
                ChangeType::TypeChanged,
                format!(
                    "type of '{}.{}' changed from {} to {}",
                    owner,
                    b.name,
                    describe(from),
                    describe(to)
                ),
            )
        })
}

// ═══════════════════════════════════════════════════════════════════════════
// 5. Fallback
// ═══════════════════════════════════════════════════════════════════════════

fn fallback_rule(before: &SymbolInfo, after: &SymbolInfo) -> RuleMatch {
    if before.signature != after.signature {
        RuleMatch::new(
            RuleId::SignatureText,
            ChangeType::SignatureChanged,
            format!("signature of '{}' changed", before.name),
        )
    } else {
        RuleMatch::new(
            RuleId::ReturnText,
            ChangeType::TypeChanged,
            format!("type of '{}' changed", before.name),
        )
    }
}
