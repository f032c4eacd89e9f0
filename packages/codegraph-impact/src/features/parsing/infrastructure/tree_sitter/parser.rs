//! Tree-sitter parser implementation
//!
//! This is where the tree-sitter grammar selection lives.

use tree_sitter::{Language, Parser as TSParser, Tree};

use super::languages::typescript::TSX_EXTENSIONS;
use crate::errors::{CodegraphError, Result};

/// Grammar dialect used for a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDialect {
    /// `.ts`, `.mts`, `.cts` and plain JavaScript
    TypeScript,
    /// `.tsx`, `.jsx`
    Tsx,
}

impl SourceDialect {
    /// Choose the dialect from a file path's extension
    pub fn from_path(path: &str) -> Self {
        let ext = path.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
        if TSX_EXTENSIONS.contains(&ext.as_str()) {
            SourceDialect::Tsx
        } else {
            SourceDialect::TypeScript
        }
    }

    fn language(&self) -> Language {
        match self {
            SourceDialect::TypeScript => tree_sitter_typescript::language_typescript(),
            SourceDialect::Tsx => tree_sitter_typescript::language_tsx(),
        }
    }
}

/// Tree-sitter based TypeScript parser
pub struct TreeSitterParser {
    dialect: SourceDialect,
    parser: TSParser,
}

impl TreeSitterParser {
    /// Create a parser for the given dialect
    pub fn new(dialect: SourceDialect) -> Result<Self> {
        let mut parser = TSParser::new();
        parser
            .set_language(&dialect.language())
            .map_err(|e| CodegraphError::parse_error(format!("grammar load failed: {}", e)))?;
        Ok(Self { dialect, parser })
    }

    /// Create a parser matching the file's extension
    pub fn for_path(path: &str) -> Result<Self> {
        Self::new(SourceDialect::from_path(path))
    }

    pub fn dialect(&self) -> SourceDialect {
        self.dialect
    }

    /// Parse source text. `None` only when tree-sitter gives up entirely.
    pub fn parse(&mut self, source: &str) -> Option<Tree> {
        self.parser.parse(source, None)
    }
}
