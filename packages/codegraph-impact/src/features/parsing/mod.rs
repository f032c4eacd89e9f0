//! Parsing Feature
//!
//! Responsible for AST parsing and declaration extraction.
//!
//! ## Structure
//! - `infrastructure/tree_sitter` - grammar selection and parser wrapper
//! - `infrastructure/extractors` - TypeScript declaration extractors

pub mod infrastructure;

pub use infrastructure::{SourceDialect, TreeSitterParser};
