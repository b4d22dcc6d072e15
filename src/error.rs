//! Typed error types for framelens.
//!
//! None of these reach the reporting entry points: the engine degrades to
//! partial output instead. They surface from the lower-level APIs
//! (`SourceCache::load`, `syntax::parse_snippet`, `Config::load`) so callers
//! of those can tell failure categories apart.

use std::path::PathBuf;

use thiserror::Error;

/// Reading a source file failed.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source file '{}' could not be read: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source file '{}' has no line {line}", path.display())]
    LineOutOfRange { path: PathBuf, line: usize },
}

/// A snippet did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line}, column {column})")]
pub struct ParseError {
    pub line: usize,
    /// 1-based column.
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// A configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{}' could not be read: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("invalid configuration: {field} {reason}")]
    OutOfRange { field: &'static str, reason: String },
}
