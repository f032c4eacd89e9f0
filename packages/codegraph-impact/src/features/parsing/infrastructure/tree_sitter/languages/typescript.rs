//! TypeScript grammar node kinds and kind predicates
//!
//! Every node kind the extractors and usage search match on is named here.

/// TypeScript tree-sitter node kinds
///
/// These constants match the exact node type names from tree-sitter-typescript grammar.
/// Source: https://github.com/tree-sitter/tree-sitter-typescript/blob/master/common/define-grammar.js
pub mod node_kinds {
    // Declarations
    pub const CLASS_DECLARATION: &str = "class_declaration";
    pub const ABSTRACT_CLASS_DECLARATION: &str = "abstract_class_declaration";
    pub const CLASS: &str = "class";
    pub const INTERFACE_DECLARATION: &str = "interface_declaration";
    pub const FUNCTION_DECLARATION: &str = "function_declaration";
    pub const FUNCTION_SIGNATURE: &str = "function_signature";
    pub const METHOD_DEFINITION: &str = "method_definition";
    pub const VARIABLE_DECLARATION: &str = "variable_declaration";
    pub const LEXICAL_DECLARATION: &str = "lexical_declaration";
    pub const VARIABLE_DECLARATOR: &str = "variable_declarator";
    pub const ENUM_DECLARATION: &str = "enum_declaration";
    pub const TYPE_ALIAS_DECLARATION: &str = "type_alias_declaration";
    pub const AMBIENT_DECLARATION: &str = "ambient_declaration";

    // Statements
    pub const EXPRESSION_STATEMENT: &str = "expression_statement";

    // Class members
    pub const PUBLIC_FIELD_DEFINITION: &str = "public_field_definition";
    pub const PROPERTY_SIGNATURE: &str = "property_signature";
    pub const METHOD_SIGNATURE: &str = "method_signature";
    pub const ABSTRACT_METHOD_SIGNATURE: &str = "abstract_method_signature";
    pub const CALL_SIGNATURE: &str = "call_signature";
    pub const INDEX_SIGNATURE: &str = "index_signature";
    pub const PRIVATE_PROPERTY_IDENTIFIER: &str = "private_property_identifier";

    // Heritage
    pub const EXTENDS_TYPE_CLAUSE: &str = "extends_type_clause";
    pub const CLASS_HERITAGE: &str = "class_heritage";
    pub const EXTENDS_CLAUSE: &str = "extends_clause";
    pub const IMPLEMENTS_CLAUSE: &str = "implements_clause";
    pub const ENUM_ASSIGNMENT: &str = "enum_assignment";

    // Functions
    pub const ARROW_FUNCTION: &str = "arrow_function";
    pub const FUNCTION_EXPRESSION: &str = "function_expression";
    pub const FUNCTION: &str = "function";
    pub const GENERATOR_FUNCTION: &str = "generator_function";
    pub const GENERATOR_FUNCTION_DECLARATION: &str = "generator_function_declaration";

    // Parameters
    pub const FORMAL_PARAMETERS: &str = "formal_parameters";
    pub const REQUIRED_PARAMETER: &str = "required_parameter";
    pub const OPTIONAL_PARAMETER: &str = "optional_parameter";
    pub const REST_PARAMETER: &str = "rest_parameter";
    pub const REST_PATTERN: &str = "rest_pattern";

    // Import/Export
    pub const IMPORT_STATEMENT: &str = "import_statement";
    pub const IMPORT_CLAUSE: &str = "import_clause";
    pub const IMPORT_REQUIRE_CLAUSE: &str = "import_require_clause";
    pub const NAMED_IMPORTS: &str = "named_imports";
    pub const IMPORT_SPECIFIER: &str = "import_specifier";
    pub const NAMESPACE_IMPORT: &str = "namespace_import";
    pub const EXPORT_STATEMENT: &str = "export_statement";
    pub const EXPORT_CLAUSE: &str = "export_clause";
    pub const EXPORT_SPECIFIER: &str = "export_specifier";
    pub const NAMESPACE_EXPORT: &str = "namespace_export";
    pub const IMPORT: &str = "import";

    // Types
    pub const TYPE_ANNOTATION: &str = "type_annotation";
    pub const TYPE_PARAMETERS: &str = "type_parameters";
    pub const TYPE_PARAMETER: &str = "type_parameter";
    pub const TYPE_IDENTIFIER: &str = "type_identifier";
    pub const NESTED_TYPE_IDENTIFIER: &str = "nested_type_identifier";
    pub const FUNCTION_TYPE: &str = "function_type";
    pub const OBJECT_TYPE: &str = "object_type";
    pub const PARENTHESIZED_TYPE: &str = "parenthesized_type";

    // Modifiers
    pub const ACCESSIBILITY_MODIFIER: &str = "accessibility_modifier";
    pub const READONLY: &str = "readonly";
    pub const STATIC: &str = "static";
    pub const ASYNC: &str = "async";
    pub const ABSTRACT: &str = "abstract";
    pub const OPTIONAL_MARK: &str = "?";

    // Expressions
    pub const CALL_EXPRESSION: &str = "call_expression";
    pub const MEMBER_EXPRESSION: &str = "member_expression";
    pub const IDENTIFIER: &str = "identifier";
    pub const PROPERTY_IDENTIFIER: &str = "property_identifier";
    pub const SHORTHAND_PROPERTY_IDENTIFIER: &str = "shorthand_property_identifier";
    pub const STRING: &str = "string";
    pub const TEMPLATE_STRING: &str = "template_string";
    pub const COMMENT: &str = "comment";
}

/// Extensions that need the TSX grammar
pub const TSX_EXTENSIONS: &[&str] = &["tsx", "jsx"];

/// Check whether a node kind is a function-valued expression
pub fn is_function_value(kind: &str) -> bool {
    matches!(
        kind,
        node_kinds::ARROW_FUNCTION
            | node_kinds::FUNCTION_EXPRESSION
            | node_kinds::FUNCTION
            | node_kinds::GENERATOR_FUNCTION
    )
}
