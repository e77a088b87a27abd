//! GLSL ES preprocessor.
//!
//! Runs over every program fragment in order, with one macro table and one
//! conditional stack shared across fragments. Each source line is handled
//! on its own: a line starting with `#` is a directive, any other line in an
//! active region is macro-expanded and appended to the output.

mod expr;
mod macros;

use std::rc::Rc;

use logos::Logos;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use wgl_diagnostic::SourceMap;
use wgl_ir::{Name, ShaderStage, Span, StringInterner};

use crate::comments::strip_comments;
use crate::extensions::{Extension, ExtensionBehavior, ExtensionSet};
use crate::raw_token::RawToken;
use crate::{LexError, LexErrorKind, LexOptions};

use macros::{Macro, MacroKind};

/// Names of macros a directive has already expanded into this token.
pub(crate) type HideSet = SmallVec<[Name; 2]>;

/// A preprocessing token.
#[derive(Clone, Debug)]
pub(crate) struct PpToken {
    pub raw: RawToken,
    /// Interned text of identifiers and numbers, `Name::EMPTY` otherwise.
    pub text: Name,
    pub span: Span,
    pub hide: HideSet,
}

impl PpToken {
    fn is_ident(&self) -> bool {
        self.raw == RawToken::Ident
    }
}

/// One source line after tokenizing.
struct Line {
    tokens: Vec<PpToken>,
    /// Invalid characters, reported only if the line is not skipped.
    invalid: Vec<LexError>,
}

#[derive(Copy, Clone, Debug)]
struct Conditional {
    span: Span,
    parent_active: bool,
    active: bool,
    /// Some branch of this group has been taken.
    taken: bool,
    seen_else: bool,
}

/// Interned names the preprocessor checks for.
struct KnownNames {
    defined: Name,
}

pub(crate) struct Preprocessed {
    pub tokens: Vec<PpToken>,
    pub errors: Vec<LexError>,
    pub extensions: ExtensionSet,
}

pub(crate) struct Preprocessor<'a> {
    sources: &'a SourceMap,
    options: &'a LexOptions,
    interner: &'a mut StringInterner,
    names: KnownNames,
    macros: FxHashMap<Name, Rc<Macro>>,
    conditionals: Vec<Conditional>,
    extensions: ExtensionSet,
    output: Vec<PpToken>,
    errors: Vec<LexError>,
    /// Any token or directive has been seen; `#version` must precede both.
    seen_content: bool,
}

impl<'a> Preprocessor<'a> {
    pub(crate) fn new(
        sources: &'a SourceMap,
        options: &'a LexOptions,
        interner: &'a mut StringInterner,
    ) -> Self {
        let names = KnownNames {
            defined: interner.intern("defined"),
        };
        let mut preprocessor = Preprocessor {
            sources,
            options,
            interner,
            names,
            macros: FxHashMap::default(),
            conditionals: Vec::new(),
            extensions: ExtensionSet::new(),
            output: Vec::new(),
            errors: Vec::new(),
            seen_content: false,
        };
        preprocessor.define_predefined();
        preprocessor
    }

    fn define_predefined(&mut self) {
        self.predefine("__LINE__", MacroKind::Line);
        self.predefine("__FILE__", MacroKind::File);
        self.predefine_value("GL_ES", 1);
        self.predefine_value("__VERSION__", 100);
        if self.options.stage == ShaderStage::Fragment && self.options.support_highp_fragment {
            self.predefine_value("GL_FRAGMENT_PRECISION_HIGH", 1);
        }
        for &extension in Extension::ALL {
            if self.supports(extension) {
                self.predefine_value(extension.name(), 1);
            }
        }
    }

    fn predefine(&mut self, name: &str, kind: MacroKind) {
        let name = self.interner.intern(name);
        self.macros.insert(
            name,
            Rc::new(Macro {
                kind,
                predefined: true,
            }),
        );
    }

    fn predefine_value(&mut self, name: &str, value: u32) {
        let body = vec![self.number_token(value, Span::DUMMY)];
        self.predefine(name, MacroKind::Object(body));
    }

    /// Whether `extension` can be enabled for this compilation.
    pub(crate) fn supports(&self, extension: Extension) -> bool {
        match extension {
            Extension::OesStandardDerivatives => {
                self.options.support_oes_derivatives && self.options.stage == ShaderStage::Fragment
            }
        }
    }

    pub(crate) fn run(mut self) -> Preprocessed {
        let sources = self.sources;
        for fragment in sources.fragments() {
            let stripped = strip_comments(&fragment.text);
            if let Some(offset) = stripped.unterminated {
                let start = fragment.start as usize + offset;
                self.error(
                    Span::from_range(start..start + 2),
                    LexErrorKind::UnterminatedComment,
                );
            }
            for line in self.tokenize(&stripped.text, fragment.start) {
                self.process_line(line);
            }
        }

        while let Some(open) = self.conditionals.pop() {
            self.error(
                open.span,
                LexErrorKind::UnbalancedConditional("unterminated conditional directive"),
            );
        }

        Preprocessed {
            tokens: self.output,
            errors: self.errors,
            extensions: self.extensions,
        }
    }

    fn error(&mut self, span: Span, kind: LexErrorKind) {
        self.errors.push(LexError::new(span, kind));
    }

    fn tokenize(&mut self, text: &str, base: u32) -> Vec<Line> {
        let base = base as usize;
        let mut lines = Vec::new();
        let mut current = Line {
            tokens: Vec::new(),
            invalid: Vec::new(),
        };
        let mut lexer = RawToken::lexer(text);
        while let Some(result) = lexer.next() {
            let range = lexer.span();
            let span = Span::from_range(base + range.start..base + range.end);
            match result {
                Ok(RawToken::Newline) => {
                    let next = Line {
                        tokens: Vec::new(),
                        invalid: Vec::new(),
                    };
                    lines.push(std::mem::replace(&mut current, next));
                }
                Ok(raw) => {
                    let text = match raw {
                        RawToken::Ident | RawToken::Number => self.interner.intern(lexer.slice()),
                        _ => Name::EMPTY,
                    };
                    current.tokens.push(PpToken {
                        raw,
                        text,
                        span,
                        hide: HideSet::new(),
                    });
                }
                Err(()) => {
                    let c = lexer.slice().chars().next().unwrap_or('\u{fffd}');
                    current
                        .invalid
                        .push(LexError::new(span, LexErrorKind::InvalidCharacter(c)));
                }
            }
        }
        lines.push(current);
        lines
    }

    fn active(&self) -> bool {
        !matches!(self.conditionals.last(), Some(c) if !c.active)
    }

    fn process_line(&mut self, line: Line) {
        let Line { tokens, invalid } = line;
        if tokens.first().is_some_and(|t| t.raw == RawToken::Hash) {
            self.directive(&tokens);
            self.seen_content = true;
            return;
        }
        if !self.active() {
            return;
        }
        self.errors.extend(invalid);
        if tokens.is_empty() {
            return;
        }
        self.seen_content = true;
        let expanded = self.expand(tokens);
        self.output.extend(expanded);
    }

    fn directive(&mut self, tokens: &[PpToken]) {
        let hash = &tokens[0];
        let Some(name_token) = tokens.get(1) else {
            // The null directive.
            return;
        };
        let rest = &tokens[2..];
        if !name_token.is_ident() {
            if self.active() {
                self.error(
                    name_token.span,
                    LexErrorKind::DirectiveSyntax("expected a directive name".into()),
                );
            }
            return;
        }
        let span = hash.span.merge(name_token.span);
        let name = Rc::clone(self.interner.storage(name_token.text));
        match &*name {
            "if" => self.directive_if(span, rest),
            "ifdef" => self.directive_ifdef(span, rest, true),
            "ifndef" => self.directive_ifdef(span, rest, false),
            "elif" => self.directive_elif(span, rest),
            "else" => self.directive_else(span),
            "endif" => self.directive_endif(span),
            _ if !self.active() => {}
            "define" => self.directive_define(span, rest),
            "undef" => self.directive_undef(span, rest),
            "error" => self.directive_error(span, rest),
            "version" => self.directive_version(span, rest),
            "extension" => self.directive_extension(span, rest),
            "pragma" | "line" => {
                tracing::trace!(directive = %name, "ignoring directive");
            }
            other => self.error(span, LexErrorKind::UnknownDirective(other.to_owned())),
        }
    }

    fn directive_if(&mut self, span: Span, rest: &[PpToken]) {
        let parent_active = self.active();
        let value = parent_active && self.eval_condition(span, rest);
        self.conditionals.push(Conditional {
            span,
            parent_active,
            active: value,
            taken: value,
            seen_else: false,
        });
    }

    fn directive_ifdef(&mut self, span: Span, rest: &[PpToken], want_defined: bool) {
        let parent_active = self.active();
        let value = match rest {
            [name] if name.is_ident() => self.macros.contains_key(&name.text) == want_defined,
            _ => {
                if parent_active {
                    self.error(
                        span,
                        LexErrorKind::DirectiveSyntax("expected one macro name".into()),
                    );
                }
                false
            }
        };
        let active = parent_active && value;
        self.conditionals.push(Conditional {
            span,
            parent_active,
            active,
            taken: active,
            seen_else: false,
        });
    }

    fn directive_elif(&mut self, span: Span, rest: &[PpToken]) {
        let Some(&top) = self.conditionals.last() else {
            self.error(span, LexErrorKind::UnbalancedConditional("#elif without #if"));
            return;
        };
        if top.seen_else {
            self.error(span, LexErrorKind::UnbalancedConditional("#elif after #else"));
        }
        let active = if top.parent_active && !top.taken {
            self.eval_condition(span, rest)
        } else {
            false
        };
        if let Some(top) = self.conditionals.last_mut() {
            top.active = active;
            top.taken |= active;
        }
    }

    fn directive_else(&mut self, span: Span) {
        let Some(top) = self.conditionals.last_mut() else {
            self.error(span, LexErrorKind::UnbalancedConditional("#else without #if"));
            return;
        };
        let duplicate = top.seen_else;
        top.active = top.parent_active && !top.taken;
        top.taken = true;
        top.seen_else = true;
        if duplicate {
            self.error(span, LexErrorKind::UnbalancedConditional("#else after #else"));
        }
    }

    fn directive_endif(&mut self, span: Span) {
        if self.conditionals.pop().is_none() {
            self.error(span, LexErrorKind::UnbalancedConditional("#endif without #if"));
        }
    }

    /// `GL_`-prefixed names and the predefined macros cannot be redefined.
    fn is_reserved_macro(&self, name: Name) -> bool {
        self.interner.lookup(name).starts_with("GL_")
            || self.macros.get(&name).is_some_and(|m| m.predefined)
    }

    fn directive_define(&mut self, span: Span, rest: &[PpToken]) {
        let Some(name_token) = rest.first().filter(|t| t.is_ident()) else {
            self.error(
                span,
                LexErrorKind::DirectiveSyntax("expected a macro name".into()),
            );
            return;
        };
        let name = name_token.text;
        if self.is_reserved_macro(name) {
            let text = self.interner.lookup(name).to_owned();
            self.error(name_token.span, LexErrorKind::ReservedMacroName(text));
            return;
        }

        let function_like = rest
            .get(1)
            .is_some_and(|t| t.raw == RawToken::LParen && t.span.start == name_token.span.end);
        let kind = if function_like {
            let Some((params, body_start)) = self.parse_params(span, &rest[2..]) else {
                return;
            };
            MacroKind::Function {
                params,
                body: rest[2 + body_start..].to_vec(),
            }
        } else {
            MacroKind::Object(rest[1..].to_vec())
        };
        let definition = Macro {
            kind,
            predefined: false,
        };

        if let Some(existing) = self.macros.get(&name) {
            if !existing.same_definition(&definition) {
                let text = self.interner.lookup(name).to_owned();
                self.error(name_token.span, LexErrorKind::MacroMismatch(text));
            }
            return;
        }
        self.macros.insert(name, Rc::new(definition));
    }

    /// Parse `a, b)` after a function-like macro's `(`. Returns the names and
    /// the index just past `)`.
    fn parse_params(&mut self, span: Span, tokens: &[PpToken]) -> Option<(Vec<Name>, usize)> {
        let mut params = Vec::new();
        let mut index = 0;
        if tokens.first().is_some_and(|t| t.raw == RawToken::RParen) {
            return Some((params, 1));
        }
        loop {
            match tokens.get(index) {
                Some(param) if param.is_ident() && !params.contains(&param.text) => {
                    params.push(param.text);
                }
                _ => break,
            }
            match tokens.get(index + 1).map(|t| t.raw) {
                Some(RawToken::Comma) => index += 2,
                Some(RawToken::RParen) => return Some((params, index + 2)),
                _ => break,
            }
        }
        self.error(
            span,
            LexErrorKind::DirectiveSyntax("malformed macro parameter list".into()),
        );
        None
    }

    fn directive_undef(&mut self, span: Span, rest: &[PpToken]) {
        let [name_token] = rest else {
            self.error(
                span,
                LexErrorKind::DirectiveSyntax("expected one macro name".into()),
            );
            return;
        };
        if !name_token.is_ident() {
            self.error(
                name_token.span,
                LexErrorKind::DirectiveSyntax("expected a macro name".into()),
            );
            return;
        }
        if self.is_reserved_macro(name_token.text) {
            let text = self.interner.lookup(name_token.text).to_owned();
            self.error(name_token.span, LexErrorKind::ReservedMacroName(text));
            return;
        }
        self.macros.remove(&name_token.text);
    }

    fn directive_error(&mut self, span: Span, rest: &[PpToken]) {
        let message = match (rest.first(), rest.last()) {
            (Some(first), Some(last)) => self
                .sources
                .snippet(first.span.merge(last.span))
                .unwrap_or_default()
                .to_owned(),
            _ => String::new(),
        };
        self.error(span, LexErrorKind::ErrorDirective(message));
    }

    fn directive_version(&mut self, span: Span, rest: &[PpToken]) {
        if self.seen_content {
            self.error(span, LexErrorKind::VersionNotFirst);
            return;
        }
        match rest {
            [version] if version.raw == RawToken::Number => {
                let text = self.interner.lookup(version.text);
                if text != "100" {
                    let text = text.to_owned();
                    self.error(version.span, LexErrorKind::VersionUnsupported(text));
                }
            }
            _ => self.error(
                span,
                LexErrorKind::DirectiveSyntax("expected a version number".into()),
            ),
        }
    }

    fn directive_extension(&mut self, span: Span, rest: &[PpToken]) {
        let [name, colon, behavior] = rest else {
            self.error(
                span,
                LexErrorKind::ExtensionDirective("expected `name : behavior`".into()),
            );
            return;
        };
        if !name.is_ident() || colon.raw != RawToken::Colon || !behavior.is_ident() {
            self.error(
                span,
                LexErrorKind::ExtensionDirective("expected `name : behavior`".into()),
            );
            return;
        }
        let behavior_text = self.interner.lookup(behavior.text);
        let Some(behavior_kind) = ExtensionBehavior::from_name(behavior_text) else {
            let message = format!("unknown behavior `{behavior_text}`");
            self.error(behavior.span, LexErrorKind::ExtensionDirective(message));
            return;
        };

        let name_text = self.interner.lookup(name.text);
        if name_text == "all" {
            match behavior_kind {
                ExtensionBehavior::Warn => {}
                ExtensionBehavior::Disable => {
                    for &extension in Extension::ALL {
                        if self.extensions.behavior(extension).is_some() {
                            self.extensions.set(extension, ExtensionBehavior::Disable);
                        }
                    }
                }
                ExtensionBehavior::Require | ExtensionBehavior::Enable => {
                    let message = format!(
                        "`all` cannot be used with `{}`",
                        behavior_kind.as_str()
                    );
                    self.error(behavior.span, LexErrorKind::ExtensionDirective(message));
                }
            }
            return;
        }

        match Extension::from_name(name_text).filter(|&ext| self.supports(ext)) {
            Some(extension) => {
                tracing::debug!(%extension, behavior = behavior_kind.as_str(), "extension");
                self.extensions.set(extension, behavior_kind);
            }
            None => {
                let text = name_text.to_owned();
                match behavior_kind {
                    ExtensionBehavior::Require => {
                        self.error(name.span, LexErrorKind::ExtensionNotSupported(text));
                    }
                    ExtensionBehavior::Enable | ExtensionBehavior::Warn => {
                        self.error(name.span, LexErrorKind::ExtensionWarnNotSupported(text));
                    }
                    ExtensionBehavior::Disable => {}
                }
            }
        }
    }

    /// Number token for generated values.
    fn number_token(&mut self, value: u32, span: Span) -> PpToken {
        PpToken {
            raw: RawToken::Number,
            text: self.interner.intern_owned(value.to_string()),
            span,
            hide: HideSet::new(),
        }
    }
}

#[cfg(test)]
mod tests;
