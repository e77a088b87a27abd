//! Recursive descent parser for GLSL ES 1.00.
//!
//! Builds a [`TranslationUnit`]: expression and statement arenas plus the
//! top-level declarations. Errors are collected, never fatal; after each one
//! the parser resynchronizes at `;` or `}`.
//!
//! Two pieces of context-sensitivity live here rather than in the lexer:
//! - struct names become type names once declared, which decides whether
//!   `S s;` is a declaration or an expression
//! - `layout(...)` is recognized by spelling, since `layout` is not an
//!   ES 1.00 keyword

mod cursor;
mod error;
mod grammar;
mod recovery;

pub use cursor::Cursor;
pub use error::ParseError;
pub use recovery::{synchronize, RecoverySet};

use rustc_hash::FxHashSet;
use wgl_ir::{Decl, ExprId, ExprKind, Name, Span, StringInterner, TokenKind, TokenList, TranslationUnit};

/// Parser settings.
#[derive(Clone, Debug, Default)]
pub struct ParseOptions {
    /// Rewrite `s`/`t`/`p`/`q` swizzles to `x`/`y`/`z`/`w`.
    pub rewrite_texcoords: bool,
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a mut StringInterner,
    options: &'a ParseOptions,
    unit: TranslationUnit,
    errors: Vec<ParseError>,
    /// Struct tags declared so far.
    struct_names: FxHashSet<Name>,
    layout: Name,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: &'a TokenList,
        interner: &'a mut StringInterner,
        options: &'a ParseOptions,
    ) -> Self {
        let layout = interner.intern("layout");
        Parser {
            cursor: Cursor::new(tokens),
            interner,
            options,
            unit: TranslationUnit::new(),
            errors: Vec::new(),
            struct_names: FxHashSet::default(),
            layout,
        }
    }

    // Cursor delegation.

    #[inline]
    fn current_kind(&self) -> TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn peek_kind(&self, n: usize) -> TokenKind {
        self.cursor.peek_kind(n)
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn advance(&mut self) -> Span {
        self.cursor.advance().span
    }

    #[inline]
    fn eat(&mut self, kind: &TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn expect(&mut self, kind: &TokenKind) -> Result<Span, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        self.cursor.expect_ident()
    }

    // Arena helpers.

    #[inline]
    fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.unit.alloc_expr(kind, span)
    }

    #[inline]
    fn expr_span(&self, id: ExprId) -> Span {
        self.unit.expr(id).span
    }

    fn is_struct_name(&self, kind: TokenKind) -> bool {
        matches!(kind, TokenKind::Ident(name) if self.struct_names.contains(&name))
    }

    /// Parse the whole token stream.
    pub fn parse_unit(mut self) -> ParseOutput {
        while !self.is_at_end() {
            let start = self.cursor.position();
            match self.parse_external_declaration() {
                Ok(decls) => self.unit.decls.extend(decls),
                Err(error) => {
                    self.errors.push(error);
                    synchronize(&mut self.cursor, RecoverySet::Declaration);
                }
            }
            if self.cursor.position() == start {
                // A stray token that no production starts with.
                self.advance();
            }
        }
        tracing::debug!(
            decls = self.unit.decls.len(),
            errors = self.errors.len(),
            "parsed translation unit"
        );
        ParseOutput {
            unit: self.unit,
            errors: self.errors,
        }
    }

    fn parse_external_declaration(&mut self) -> Result<Vec<Decl>, ParseError> {
        if self.eat(&TokenKind::Semicolon) {
            return Ok(Vec::new());
        }
        self.parse_declaration(true)
    }
}

/// Parse result: the translation unit and any errors.
#[derive(Clone, Debug)]
pub struct ParseOutput {
    pub unit: TranslationUnit,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn have_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn first_error(&self) -> Option<&ParseError> {
        self.errors.first()
    }
}

/// Parse a lexed token stream.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(
    tokens: &TokenList,
    interner: &mut StringInterner,
    options: &ParseOptions,
) -> ParseOutput {
    Parser::new(tokens, interner, options).parse_unit()
}
