//! Error types for codegraph-impact
//!
//! Provides unified error handling across the crate.
//!
//! Most conditions met during normal analysis are NOT errors. Malformed source
//! degrades a snapshot, an unresolvable specifier drops its edge and an
//! unreadable file is skipped. Only setup failures (bad scan root, bad config)
//! surface here.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for codegraph-impact operations
#[derive(Debug, Error)]
pub enum CodegraphError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Analysis error
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CodegraphError {
    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        CodegraphError::Parse(msg.into())
    }

    /// Create an internal error (alias for analysis error)
    pub fn internal(msg: impl Into<String>) -> Self {
        CodegraphError::Analysis(msg.into())
    }
}

/// Result type alias for codegraph operations
pub type Result<T> = std::result::Result<T, CodegraphError>;
