//! TypeScript AST extractors
//!
//! This module provides extractors for TypeScript declarations:
//! - Functions (regular, arrow, async, generators, overload signatures)
//! - Classes (public surface only)
//! - Interfaces and object-literal types
//! - Type aliases and enums
//! - Variables (function-valued bindings)
//! - Imports/Exports (ESM, CommonJS `require`, dynamic `import()`)
//!
//! Design: Each extractor is independent and testable.

pub mod class;
pub mod common;
pub mod r#enum;
pub mod export;
pub mod function;
pub mod import;
pub mod interface;
pub mod r#type;
pub mod variable;

pub use class::extract_class;
pub use export::{export_for_declaration, extract_export_statement, ExportStatement};
pub use function::{extract_function_declaration, extract_parameters, render_parameters};
pub use import::{extract_call_import, extract_import_statement};
pub use interface::{extract_interface, extract_shape_members};
pub use r#enum::extract_enum;
pub use r#type::{extract_type_alias, type_text};
pub use variable::{extract_variable_declaration, VariableBindings};
