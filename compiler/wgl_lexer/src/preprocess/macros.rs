//! Macro definitions and expansion.
//!
//! Expansion follows the hide-set algorithm: every token produced by
//! expanding macro `M` carries `M` in its hide set and is never expanded by
//! `M` again, so self-referential macros terminate.

use std::collections::VecDeque;
use std::rc::Rc;

use wgl_ir::Name;

use super::{HideSet, PpToken, Preprocessor};
use crate::raw_token::RawToken;
use crate::LexErrorKind;

#[derive(Debug)]
pub(crate) enum MacroKind {
    Object(Vec<PpToken>),
    Function { params: Vec<Name>, body: Vec<PpToken> },
    /// `__LINE__`
    Line,
    /// `__FILE__`
    File,
}

#[derive(Debug)]
pub(crate) struct Macro {
    pub kind: MacroKind,
    pub predefined: bool,
}

impl Macro {
    /// Token-by-token comparison of two definitions.
    pub(crate) fn same_definition(&self, other: &Macro) -> bool {
        fn same_tokens(a: &[PpToken], b: &[PpToken]) -> bool {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|(x, y)| x.raw == y.raw && x.text == y.text)
        }

        match (&self.kind, &other.kind) {
            (MacroKind::Object(a), MacroKind::Object(b)) => same_tokens(a, b),
            (
                MacroKind::Function { params: pa, body: ba },
                MacroKind::Function { params: pb, body: bb },
            ) => pa == pb && same_tokens(ba, bb),
            _ => false,
        }
    }
}

/// Copy `token` to an expansion site, extending its hide set.
fn expanded_token(token: &PpToken, site: &PpToken, name: Name, keep_span: bool) -> PpToken {
    let mut hide: HideSet = token.hide.clone();
    for &hidden in site.hide.iter().chain(std::iter::once(&name)) {
        if !hide.contains(&hidden) {
            hide.push(hidden);
        }
    }
    PpToken {
        raw: token.raw,
        text: token.text,
        span: if keep_span { token.span } else { site.span },
        hide,
    }
}

/// Split a parenthesised argument list off the front of `input`.
///
/// The front token must be `(`. Returns `None` when the closing `)` is not on
/// this line.
fn collect_args(input: &mut VecDeque<PpToken>) -> Option<Vec<Vec<PpToken>>> {
    input.pop_front();
    let mut args = Vec::new();
    let mut current = Vec::new();
    let mut depth = 1usize;
    while let Some(token) = input.pop_front() {
        match token.raw {
            RawToken::LParen => depth += 1,
            RawToken::RParen => {
                depth -= 1;
                if depth == 0 {
                    args.push(current);
                    return Some(args);
                }
            }
            RawToken::Comma if depth == 1 => {
                args.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(token);
    }
    None
}

impl Preprocessor<'_> {
    /// Fully macro-expand one line of tokens.
    pub(super) fn expand(&mut self, tokens: Vec<PpToken>) -> Vec<PpToken> {
        let mut input: VecDeque<PpToken> = tokens.into();
        let mut out = Vec::with_capacity(input.len());

        while let Some(token) = input.pop_front() {
            if !token.is_ident() || token.hide.contains(&token.text) {
                out.push(token);
                continue;
            }
            let Some(definition) = self.macros.get(&token.text).map(Rc::clone) else {
                out.push(token);
                continue;
            };

            let replacement = match &definition.kind {
                MacroKind::Line => {
                    let line = self.sources.locate(token.span).map_or(0, |loc| loc.line);
                    vec![self.number_token(line, token.span)]
                }
                MacroKind::File => {
                    let index = self
                        .sources
                        .locate(token.span)
                        .map_or(0, |loc| loc.fragment_index);
                    let index = u32::try_from(index).unwrap_or(u32::MAX);
                    vec![self.number_token(index, token.span)]
                }
                MacroKind::Object(body) => body
                    .iter()
                    .map(|t| expanded_token(t, &token, token.text, false))
                    .collect(),
                MacroKind::Function { params, body } => {
                    if input.front().map(|t| t.raw) != Some(RawToken::LParen) {
                        out.push(token);
                        continue;
                    }
                    let Some(args) = collect_args(&mut input) else {
                        let name = self.interner.lookup(token.text).to_owned();
                        self.error(token.span, LexErrorKind::UnterminatedInvocation(name));
                        continue;
                    };
                    let found = if params.is_empty() && args.len() == 1 && args[0].is_empty() {
                        0
                    } else {
                        args.len()
                    };
                    if found != params.len() {
                        let name = self.interner.lookup(token.text).to_owned();
                        self.error(
                            token.span,
                            LexErrorKind::MacroArguments {
                                name,
                                expected: params.len(),
                                found,
                            },
                        );
                        continue;
                    }
                    let args: Vec<Vec<PpToken>> = args
                        .into_iter()
                        .map(|arg| self.expand(arg))
                        .collect();
                    let mut replacement = Vec::with_capacity(body.len());
                    for body_token in body {
                        match params.iter().position(|&p| {
                            body_token.is_ident() && p == body_token.text
                        }) {
                            Some(index) => replacement.extend(
                                args[index]
                                    .iter()
                                    .map(|t| expanded_token(t, &token, token.text, true)),
                            ),
                            None => {
                                replacement.push(expanded_token(
                                    body_token, &token, token.text, false,
                                ));
                            }
                        }
                    }
                    replacement
                }
            };

            for expanded in replacement.into_iter().rev() {
                input.push_front(expanded);
            }
        }

        out
    }
}
