//! Error types and handling for template formatting operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for template formatting operations
#[derive(Debug, Error)]
pub enum TatamiError {
    /// A grammar could not be loaded into the tree-sitter runtime
    #[error("Grammar error: {message}")]
    GrammarError { message: String },

    /// Parse errors from tree-sitter
    #[error("Parse error: {message}")]
    ParseError { message: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting pipeline errors
    #[error("Format error: {message}")]
    FormatError { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Grammar,
    Parse,
    Config,
    Io,
    Format,
    Internal,
}

impl TatamiError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TatamiError::GrammarError { .. } => ErrorKind::Grammar,
            TatamiError::ParseError { .. } => ErrorKind::Parse,
            TatamiError::ConfigError { .. } => ErrorKind::Config,
            TatamiError::IoError { .. } => ErrorKind::Io,
            TatamiError::FormatError { .. } => ErrorKind::Format,
            TatamiError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse | ErrorKind::Format)
    }

    /// Create a grammar-loading error
    pub fn grammar_error(message: impl Into<String>) -> Self {
        Self::GrammarError {
            message: message.into(),
        }
    }

    /// Create a parser error
    pub fn parser_error(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create a formatting error
    pub fn format_error(message: impl Into<String>) -> Self {
        Self::FormatError {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for TatamiError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
