//! Lexer for GLSL ES 1.00 using logos with string interning.
//!
//! Lexing runs in three steps:
//! 1. comments are blanked out, keeping offsets
//! 2. logos splits each fragment into preprocessing tokens, which the
//!    preprocessor filters through conditionals and macro expansion
//! 3. surviving tokens become [`TokenKind`]s: keywords are resolved, numbers
//!    parsed and identifiers interned
//!
//! Errors never stop lexing. The parser should only run when
//! [`LexOutput::have_errors`] is false.

mod comments;
mod convert;
mod extensions;
mod keywords;
mod lex_error;
mod number;
mod preprocess;
mod raw_token;

pub use extensions::{Extension, ExtensionBehavior, ExtensionSet};
pub use lex_error::{LexError, LexErrorKind};

use wgl_diagnostic::source_map::SourceFragment;
use wgl_diagnostic::SourceMap;
use wgl_ir::{ShaderStage, Span, StringInterner, Token, TokenKind, TokenList};

use convert::convert_token;
use preprocess::{Preprocessed, Preprocessor};

/// Settings that change what the preprocessor predefines and accepts.
#[derive(Clone, Debug)]
pub struct LexOptions {
    pub stage: ShaderStage,
    /// Defines `GL_FRAGMENT_PRECISION_HIGH` in fragment shaders.
    pub support_highp_fragment: bool,
    /// Allows `GL_OES_standard_derivatives` in fragment shaders.
    pub support_oes_derivatives: bool,
}

impl Default for LexOptions {
    fn default() -> Self {
        LexOptions {
            stage: ShaderStage::Fragment,
            support_highp_fragment: false,
            support_oes_derivatives: false,
        }
    }
}

/// Tokens plus everything the lexer learned along the way.
#[derive(Clone, Debug, Default)]
pub struct LexOutput {
    pub tokens: TokenList,
    /// Errors and warnings in source order.
    pub errors: Vec<LexError>,
    pub extensions: ExtensionSet,
}

impl LexOutput {
    pub fn have_errors(&self) -> bool {
        self.errors.iter().any(|e| !e.is_warning())
    }

    pub fn first_error(&self) -> Option<&LexError> {
        self.errors.iter().find(|e| !e.is_warning())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &LexError> {
        self.errors.iter().filter(|e| e.is_warning())
    }
}

/// Lex every fragment of a program into one token stream.
#[tracing::instrument(level = "debug", skip_all)]
pub fn lex(sources: &SourceMap, options: &LexOptions, interner: &mut StringInterner) -> LexOutput {
    let Preprocessed {
        tokens: pp_tokens,
        mut errors,
        extensions,
    } = Preprocessor::new(sources, options, interner).run();

    let mut tokens = TokenList::new();
    for token in &pp_tokens {
        match convert_token(token, interner) {
            Ok(kind) => tokens.push(Token::new(kind, token.span)),
            Err(kind) => {
                errors.push(LexError::new(token.span, kind));
                tokens.push(Token::new(TokenKind::Error, token.span));
            }
        }
    }

    let eof = sources.fragments().last().map_or(0, SourceFragment::end);
    tokens.push(Token::new(TokenKind::Eof, Span::point(eof)));

    errors.sort_by_key(|e| e.span.start);
    tracing::debug!(tokens = tokens.len(), errors = errors.len(), "lexed");
    LexOutput {
        tokens,
        errors,
        extensions,
    }
}

#[cfg(test)]
mod tests;
