//! Lexer and preprocessor errors.

use std::fmt;

use wgl_diagnostic::{Diagnostic, ErrorCode};
use wgl_ir::Span;

/// A lexical error or warning with its location.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

/// What went wrong.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    InvalidCharacter(char),
    InvalidNumber(String),
    ReservedWord(String),
    UnterminatedComment,
    /// Malformed directive; the payload says what was expected.
    DirectiveSyntax(String),
    /// `#error` with its message text.
    ErrorDirective(String),
    UnknownDirective(String),
    VersionNotFirst,
    VersionUnsupported(String),
    ExtensionNotSupported(String),
    ExtensionWarnNotSupported(String),
    ExtensionDirective(String),
    MacroMismatch(String),
    ReservedMacroName(String),
    UnbalancedConditional(&'static str),
    MacroArguments {
        name: String,
        expected: usize,
        found: usize,
    },
    UnterminatedInvocation(String),
}

impl LexErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexErrorKind::InvalidCharacter(_) => ErrorCode::E0001,
            LexErrorKind::InvalidNumber(_) => ErrorCode::E0002,
            LexErrorKind::ReservedWord(_) => ErrorCode::E0003,
            LexErrorKind::UnterminatedComment => ErrorCode::E0004,
            LexErrorKind::DirectiveSyntax(_) => ErrorCode::E0010,
            LexErrorKind::ErrorDirective(_) => ErrorCode::E0011,
            LexErrorKind::UnknownDirective(_) => ErrorCode::E0012,
            LexErrorKind::VersionNotFirst => ErrorCode::E0013,
            LexErrorKind::VersionUnsupported(_) => ErrorCode::E0014,
            LexErrorKind::ExtensionNotSupported(_) => ErrorCode::E0015,
            LexErrorKind::ExtensionWarnNotSupported(_) => ErrorCode::E0016,
            LexErrorKind::ExtensionDirective(_) => ErrorCode::E0017,
            LexErrorKind::MacroMismatch(_) => ErrorCode::E0018,
            LexErrorKind::ReservedMacroName(_) => ErrorCode::E0019,
            LexErrorKind::UnbalancedConditional(_) => ErrorCode::E0020,
            LexErrorKind::MacroArguments { .. } | LexErrorKind::UnterminatedInvocation(_) => {
                ErrorCode::E0021
            }
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::InvalidCharacter(c) => write!(f, "invalid character `{}`", c.escape_default()),
            LexErrorKind::InvalidNumber(text) => write!(f, "invalid number literal `{text}`"),
            LexErrorKind::ReservedWord(word) => write!(f, "`{word}` is a reserved word"),
            LexErrorKind::UnterminatedComment => write!(f, "unterminated block comment"),
            LexErrorKind::DirectiveSyntax(what) => write!(f, "malformed directive: {what}"),
            LexErrorKind::ErrorDirective(text) => write!(f, "#error {text}"),
            LexErrorKind::UnknownDirective(name) => write!(f, "unknown directive `#{name}`"),
            LexErrorKind::VersionNotFirst => {
                write!(f, "#version must come before anything else")
            }
            LexErrorKind::VersionUnsupported(version) => {
                write!(f, "unsupported shading language version `{version}`")
            }
            LexErrorKind::ExtensionNotSupported(name) => {
                write!(f, "extension `{name}` is not supported")
            }
            LexErrorKind::ExtensionWarnNotSupported(name) => {
                write!(f, "extension `{name}` is not supported and will be ignored")
            }
            LexErrorKind::ExtensionDirective(what) => write!(f, "invalid #extension: {what}"),
            LexErrorKind::MacroMismatch(name) => {
                write!(f, "macro `{name}` redefined with a different body")
            }
            LexErrorKind::ReservedMacroName(name) => {
                write!(f, "macro name `{name}` is reserved")
            }
            LexErrorKind::UnbalancedConditional(what) => write!(f, "{what}"),
            LexErrorKind::MacroArguments {
                name,
                expected,
                found,
            } => write!(
                f,
                "macro `{name}` takes {expected} argument{}, found {found}",
                if *expected == 1 { "" } else { "s" }
            ),
            LexErrorKind::UnterminatedInvocation(name) => {
                write!(f, "invocation of macro `{name}` is not closed on its line")
            }
        }
    }
}

impl LexError {
    pub fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError { span, kind }
    }

    /// Warnings do not fail the lex stage.
    pub fn is_warning(&self) -> bool {
        matches!(self.kind, LexErrorKind::ExtensionWarnNotSupported(_))
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.kind.code();
        let diag = if self.is_warning() {
            Diagnostic::warning(code)
        } else {
            Diagnostic::error(code)
        };
        let diag = diag
            .with_message(self.kind.to_string())
            .with_label(self.span, label_for(&self.kind));
        match &self.kind {
            LexErrorKind::ReservedWord(_) => {
                diag.with_note("GLSL ES 1.00 reserves this word for future use")
            }
            LexErrorKind::VersionUnsupported(_) => diag.with_suggestion("use `#version 100`"),
            _ => diag,
        }
    }
}

fn label_for(kind: &LexErrorKind) -> &'static str {
    match kind {
        LexErrorKind::InvalidCharacter(_) => "not valid in GLSL ES source",
        LexErrorKind::InvalidNumber(_) => "malformed or out of range",
        LexErrorKind::UnterminatedComment => "comment starts here",
        LexErrorKind::ErrorDirective(_) => "raised here",
        LexErrorKind::MacroArguments { .. } | LexErrorKind::UnterminatedInvocation(_) => {
            "invoked here"
        }
        _ => "",
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.span)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_codes() {
        let err = LexError::new(Span::new(0, 1), LexErrorKind::InvalidCharacter('@'));
        assert_eq!(err.kind.code(), ErrorCode::E0001);
        assert!(!err.is_warning());
        assert_eq!(err.to_string(), "invalid character `@` at 0..1");
    }

    #[test]
    fn test_warning_diagnostic() {
        let err = LexError::new(
            Span::new(0, 10),
            LexErrorKind::ExtensionWarnNotSupported("GL_EXT_foo".into()),
        );
        let diag = err.to_diagnostic();
        assert!(diag.is_warning());
        assert_eq!(diag.code, ErrorCode::E0016);
    }

    #[test]
    fn test_macro_arguments_message() {
        let kind = LexErrorKind::MacroArguments {
            name: "SQR".into(),
            expected: 1,
            found: 2,
        };
        assert_eq!(kind.to_string(), "macro `SQR` takes 1 argument, found 2");
        assert_eq!(kind.code(), ErrorCode::E0021);
    }
}
