//! AST extractors

pub mod typescript;
