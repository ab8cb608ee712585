//! Error types for sqlbridge.

use serde::Serialize;
use thiserror::Error;

use crate::ast::NodeKind;
use crate::tokenizer::Span;

/// A construct that has no rendering in the target dialect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnsupportedDiagnostic {
    pub dialect: String,
    pub kind: NodeKind,
    pub message: String,
}

impl std::fmt::Display for UnsupportedDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.dialect, self.kind, self.message)
    }
}

/// The main error type for sqlbridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Malformed lexical structure (unterminated string, comment or identifier).
    #[error("Syntax error ({dialect}) at line {line}, column {col}: {message}")]
    Syntax {
        dialect: String,
        message: String,
        line: usize,
        col: usize,
        span: Span,
    },

    /// The token sequence matches no grammar production.
    #[error("Parse error ({dialect}) at line {line}, column {col} near '{near}': {message}")]
    Parse {
        dialect: String,
        message: String,
        near: String,
        line: usize,
        col: usize,
        span: Span,
    },

    /// One or more constructs cannot be rendered in the target dialect.
    #[error("Unsupported in {dialect}: {}", join_diagnostics(.diagnostics))]
    Unsupported {
        dialect: String,
        diagnostics: Vec<UnsupportedDiagnostic>,
    },

    #[error("Unknown dialect: '{0}'")]
    UnknownDialect(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_diagnostics(diagnostics: &[UnsupportedDiagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("{}: {}", d.kind, d.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl BridgeError {
    pub fn syntax(dialect: &str, message: impl Into<String>, line: usize, col: usize, span: Span) -> Self {
        Self::Syntax {
            dialect: dialect.to_string(),
            message: message.into(),
            line,
            col,
            span,
        }
    }

    pub fn unsupported(dialect: &str, diagnostics: Vec<UnsupportedDiagnostic>) -> Self {
        Self::Unsupported {
            dialect: dialect.to_string(),
            diagnostics,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Short category name, handy for reporting.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Syntax { .. } => "SyntaxError",
            Self::Parse { .. } => "ParseError",
            Self::Unsupported { .. } => "UnsupportedError",
            Self::UnknownDialect(_) => "UnknownDialect",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
        }
    }

    /// Source span of the offending text, when the error has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Syntax { span, .. } | Self::Parse { span, .. } => Some(*span),
            _ => None,
        }
    }
}

/// Result type alias for sqlbridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
