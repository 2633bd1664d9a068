//! Error types raised while compiling a query.
//!
//! Every error is produced synchronously, before the record source is touched.

use thiserror::Error;

use crate::ast::Position;

/// Errors that can occur when lexing, parsing or binding a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Malformed token or token sequence.
    #[error("Syntax error at position {position}: {message}")]
    Syntax { message: String, position: Position },

    /// Numeric literal does not follow the strict number grammar.
    #[error("Invalid number format.")]
    NumberFormat,

    /// The field name has no mapping in the registry.
    #[error("Unknown field '{name}'")]
    UnknownField { name: String },

    /// The literal or operator cannot be applied to the field's type.
    #[error("Type mismatch on field '{field}': {message}")]
    TypeMismatch { field: String, message: String },
}

impl QueryError {
    pub(crate) fn syntax(message: impl Into<String>, position: Position) -> Self {
        QueryError::Syntax {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn mismatch(field: &str, message: impl Into<String>) -> Self {
        QueryError::TypeMismatch {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type for query compilation.
pub type Result<T> = std::result::Result<T, QueryError>;
