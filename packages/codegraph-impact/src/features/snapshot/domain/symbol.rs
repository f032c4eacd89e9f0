//! Symbol-level domain models
//!
//! One `SymbolInfo` per top-level declaration. Kind-specific facts live in the
//! `SymbolDetail` tagged union so the differ can match on them exhaustively.

use serde::{Deserialize, Serialize};

/// Declaration kind of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Interface,
    Type,
    Enum,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Type => "type",
            SymbolKind::Enum => "enum",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub type_annotation: Option<String>,
    pub is_optional: bool,
    pub is_rest: bool,
}

impl ParameterInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_annotation: None,
            is_optional: false,
            is_rest: false,
        }
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.type_annotation = Some(ty.into());
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn rest(mut self) -> Self {
        self.is_rest = true;
        self
    }
}

/// Property of an interface or object-literal type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    pub type_text: Option<String>,
    pub is_optional: bool,
    pub is_readonly: bool,
}

/// Method signature inside an interface or object-literal type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignatureInfo {
    pub name: String,
    pub parameters: Vec<ParameterInfo>,
    pub return_type: Option<String>,
    pub is_optional: bool,
}

/// `(a: T): R` call signature of a callable type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSignature {
    pub parameters: Vec<ParameterInfo>,
    pub return_type: Option<String>,
}

/// `[key: K]: V` index signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSignature {
    pub key_name: String,
    pub key_type: String,
    pub value_type: Option<String>,
    pub is_readonly: bool,
}

/// Structural members of an interface or object-literal type alias
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeDetail {
    pub extends: Vec<String>,
    pub properties: Vec<PropertyInfo>,
    pub methods: Vec<MethodSignatureInfo>,
    pub call_signature: Option<CallSignature>,
    pub index_signature: Option<IndexSignature>,
}

impl ShapeDetail {
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodSignatureInfo> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Kind of a class member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassMemberKind {
    Method,
    Property,
    Constructor,
    Getter,
    Setter,
}

/// Public or protected member of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMember {
    pub name: String,
    pub kind: ClassMemberKind,
    pub parameters: Vec<ParameterInfo>,
    pub return_type: Option<String>,
    pub type_text: Option<String>,
    pub is_static: bool,
    pub is_optional: bool,
    pub is_readonly: bool,
}

impl ClassMember {
    /// Key that distinguishes `get x` from `set x` and static from instance members
    pub fn key(&self) -> (String, ClassMemberKind, bool) {
        (self.name.clone(), self.kind, self.is_static)
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self.kind,
            ClassMemberKind::Method | ClassMemberKind::Constructor | ClassMemberKind::Setter
        )
    }
}

/// Kind-specific symbol facts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum SymbolDetail {
    Function {
        is_async: bool,
        is_arrow: bool,
        is_generator: bool,
        type_parameters: Vec<String>,
    },
    Class {
        extends: Option<String>,
        implements: Vec<String>,
        is_abstract: bool,
        members: Vec<ClassMember>,
    },
    Interface(ShapeDetail),
    TypeAlias {
        type_text: String,
        shape: Option<ShapeDetail>,
    },
    Enum {
        members: Vec<String>,
        is_const: bool,
    },
}

impl SymbolDetail {
    /// Structural shape, when this symbol has one
    pub fn shape(&self) -> Option<&ShapeDetail> {
        match self {
            SymbolDetail::Interface(shape) => Some(shape),
            SymbolDetail::TypeAlias { shape, .. } => shape.as_ref(),
            _ => None,
        }
    }
}

/// Top-level symbol extracted from one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub qualified_name: String,
    pub kind: SymbolKind,
    pub signature: String,
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterInfo>,
    pub is_exported: bool,
    pub overloads: Vec<String>,
    /// 1-based declaration line
    pub line: u32,
    pub detail: SymbolDetail,
}

impl SymbolInfo {
    /// True when two versions of the symbol are structurally identical.
    ///
    /// Export status and position are not part of the structure.
    pub fn same_structure(&self, other: &SymbolInfo) -> bool {
        self.signature == other.signature
            && self.return_type == other.return_type
            && self.overloads == other.overloads
            && self.parameters == other.parameters
            && self.detail == other.detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(SymbolKind::Function.as_str(), "function");
        assert_eq!(SymbolKind::Type.to_string(), "type");
    }

    #[test]
    fn test_detail_serde_is_tagged() {
        let detail = SymbolDetail::Enum {
            members: vec!["A".to_string()],
            is_const: true,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["detail"], "enum");
        let back: SymbolDetail = serde_json::from_value(json).unwrap();
        assert_eq!(back, detail);
    }

    #[test]
    fn test_same_structure_ignores_line_and_export() {
        let a = SymbolInfo {
            name: "f".to_string(),
            qualified_name: "f".to_string(),
            kind: SymbolKind::Function,
            signature: "function f()".to_string(),
            return_type: None,
            parameters: vec![],
            is_exported: true,
            overloads: vec![],
            line: 1,
            detail: SymbolDetail::Function {
                is_async: false,
                is_arrow: false,
                is_generator: false,
                type_parameters: vec![],
            },
        };
        let mut b = a.clone();
        b.line = 40;
        b.is_exported = false;
        assert!(a.same_structure(&b));
    }
}
