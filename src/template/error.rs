//! Template error definitions.

use thiserror::Error;

/// Errors raised while turning page markup into a directive tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `<for>` or `<if>` block was opened but never closed.
    #[error("unclosed <{tag}> opened at byte {offset}")]
    Unclosed { tag: &'static str, offset: usize },

    /// A closing tag with no matching opener (or the wrong opener).
    #[error("unexpected </{tag}> at byte {offset}")]
    UnexpectedClose { tag: &'static str, offset: usize },

    /// The `let X` part of a loop is not a plain identifier.
    #[error("invalid loop binding '{binding}' at byte {offset}")]
    InvalidLoopBinding { binding: String, offset: usize },

    /// The `response` attribute of the fetch wrapper is not an identifier.
    #[error("invalid response variable '{0}'")]
    InvalidResponseVar(String),

    /// An expression could not be parsed.
    #[error("invalid expression '{source_text}': {message}")]
    Expression {
        source_text: String,
        message: String,
    },
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
