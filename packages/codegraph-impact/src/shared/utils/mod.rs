//! Shared utilities

pub mod text;
pub mod tree_sitter;

pub use text::{find_word, normalize_type_text, strip_quotes};
