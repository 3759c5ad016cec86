use thiserror::Error;

use crate::types::ElementType;

/// Classifies errors for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// A declared length runs past the end of the buffer
    Truncated,
    /// A field is structurally invalid (bad length nibble, unknown auth param, etc.)
    MalformedField,
    /// Profile configuration is invalid
    Config,
    /// File or JSON I/O failure
    Io,
}

/// ANQP engine error types
#[derive(Error, Debug)]
pub enum AnqpError {
    #[error("Truncated {context}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        context: &'static str,
        needed: usize,
        remaining: usize,
    },

    #[error("Malformed {context}: {message}")]
    MalformedField {
        context: &'static str,
        message: String,
    },

    #[error("Invalid {element} element: {source}")]
    InvalidElement {
        element: ElementType,
        #[source]
        source: Box<AnqpError>,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AnqpError {
    pub(crate) fn truncated(context: &'static str, needed: usize, remaining: usize) -> Self {
        AnqpError::Truncated {
            context,
            needed,
            remaining,
        }
    }

    pub(crate) fn malformed(context: &'static str, message: impl Into<String>) -> Self {
        AnqpError::MalformedField {
            context,
            message: message.into(),
        }
    }

    /// Classify this error. Element wrappers report the kind of their cause.
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            AnqpError::Truncated { .. } => DecodeErrorKind::Truncated,
            AnqpError::MalformedField { .. } => DecodeErrorKind::MalformedField,
            AnqpError::InvalidElement { source, .. } => source.kind(),
            AnqpError::ConfigError(_) | AnqpError::ParseError(_) => DecodeErrorKind::Config,
            AnqpError::IoError(_) | AnqpError::JsonError(_) => DecodeErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnqpError>;
