//! Parse error type.

use std::fmt;

use wgl_diagnostic::{Diagnostic, ErrorCode};
use wgl_ir::Span;

/// Parse error with an error code for rich diagnostics.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Location of the error.
    pub span: Span,
    /// Label text for the primary span.
    pub context: Option<String>,
    /// Extra help lines, rendered as notes.
    pub help: Vec<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
            help: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Convert to a full Diagnostic for rich error reporting.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code)
            .with_message(&self.message)
            .with_label(self.span, self.context.as_deref().unwrap_or("here"));
        self.help
            .iter()
            .fold(diag, |diag, help| diag.with_note(help.as_str()))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_diagnostic_carries_context_and_help() {
        let error = ParseError::new(ErrorCode::E1006, "operator `%` is reserved", Span::new(4, 5))
            .with_context("reserved operator")
            .with_help("GLSL ES 1.00 has no integer remainder; use `mod`");
        let diag = error.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E1006);
        assert_eq!(diag.message, "operator `%` is reserved");
        assert_eq!(diag.primary_span(), Some(Span::new(4, 5)));
        assert_eq!(diag.labels[0].message, "reserved operator");
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn test_label_defaults_to_here() {
        let diag = ParseError::new(ErrorCode::E1001, "bad", Span::new(0, 1)).to_diagnostic();
        assert_eq!(diag.labels[0].message, "here");
    }
}
