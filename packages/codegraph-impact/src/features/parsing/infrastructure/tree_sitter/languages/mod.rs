//! Tree-sitter language configuration

pub mod typescript;
