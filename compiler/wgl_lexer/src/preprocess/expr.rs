//! `#if` / `#elif` expression evaluation.
//!
//! `defined NAME` and `defined(NAME)` are resolved first, then the line is
//! macro-expanded and evaluated as a C integer constant expression over
//! `i64`. An identifier left after expansion is an error, as GLSL ES
//! requires.

use wgl_ir::{Span, StringInterner, TokenKind};

use super::{PpToken, Preprocessor};
use crate::number::parse_number;
use crate::raw_token::RawToken;
use crate::LexErrorKind;

type EvalResult = Result<i64, (Span, String)>;

impl Preprocessor<'_> {
    /// Evaluate a conditional directive's expression; errors count as false.
    pub(super) fn eval_condition(&mut self, directive: Span, tokens: &[PpToken]) -> bool {
        let mut resolved = Vec::with_capacity(tokens.len());
        let mut index = 0;
        while index < tokens.len() {
            let token = &tokens[index];
            if !(token.is_ident() && token.text == self.names.defined) {
                resolved.push(token.clone());
                index += 1;
                continue;
            }
            let operand = match (tokens.get(index + 1), tokens.get(index + 2), tokens.get(index + 3)) {
                (Some(name), _, _) if name.is_ident() => Some((name, 2)),
                (Some(open), Some(name), Some(close))
                    if open.raw == RawToken::LParen
                        && name.is_ident()
                        && close.raw == RawToken::RParen =>
                {
                    Some((name, 4))
                }
                _ => None,
            };
            let Some((name, consumed)) = operand else {
                self.error(
                    token.span,
                    LexErrorKind::DirectiveSyntax("expected a macro name after `defined`".into()),
                );
                return false;
            };
            let value = u32::from(self.macros.contains_key(&name.text));
            resolved.push(self.number_token(value, token.span));
            index += consumed;
        }

        let expanded = self.expand(resolved);
        if expanded.is_empty() {
            self.error(
                directive,
                LexErrorKind::DirectiveSyntax("expected an expression".into()),
            );
            return false;
        }

        let mut parser = CondParser {
            tokens: &expanded,
            pos: 0,
            interner: self.interner,
        };
        let result = parser.expression(0).and_then(|value| match parser.peek() {
            Some(extra) => Err((extra.span, format!("unexpected {}", parser.describe(extra)))),
            None => Ok(value),
        });
        match result {
            Ok(value) => value != 0,
            Err((span, message)) => {
                self.error(span, LexErrorKind::DirectiveSyntax(message));
                false
            }
        }
    }
}

/// Binding power of a binary operator, higher binds tighter.
fn binary_power(raw: RawToken) -> Option<u8> {
    let power = match raw {
        RawToken::PipePipe => 1,
        RawToken::AmpAmp => 2,
        RawToken::Pipe => 3,
        RawToken::Caret => 4,
        RawToken::Amp => 5,
        RawToken::EqEq | RawToken::NotEq => 6,
        RawToken::Lt | RawToken::Gt | RawToken::LtEq | RawToken::GtEq => 7,
        RawToken::Shl | RawToken::Shr => 8,
        RawToken::Plus | RawToken::Minus => 9,
        RawToken::Star | RawToken::Slash | RawToken::Percent => 10,
        _ => return None,
    };
    Some(power)
}

struct CondParser<'t> {
    tokens: &'t [PpToken],
    pos: usize,
    interner: &'t StringInterner,
}

impl CondParser<'_> {
    fn peek(&self) -> Option<&PpToken> {
        self.tokens.get(self.pos)
    }

    fn end_span(&self) -> Span {
        self.tokens.last().map_or(Span::DUMMY, |t| Span::point(t.span.end))
    }

    fn describe(&self, token: &PpToken) -> String {
        match token.raw {
            RawToken::Ident => format!("identifier `{}`", self.interner.lookup(token.text)),
            RawToken::Number => format!("`{}`", self.interner.lookup(token.text)),
            raw => format!("`{}`", raw.punct_str()),
        }
    }

    /// Precedence climbing; every binary operator is left-associative.
    fn expression(&mut self, min_power: u8) -> EvalResult {
        let mut lhs = self.unary()?;
        while let Some(token) = self.peek() {
            let Some(power) = binary_power(token.raw) else {
                break;
            };
            if power <= min_power {
                break;
            }
            let (op, span) = (token.raw, token.span);
            self.pos += 1;
            let rhs = self.expression(power)?;
            lhs = apply_binary(op, lhs, rhs).ok_or_else(|| (span, "division by zero".to_owned()))?;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> EvalResult {
        let Some(token) = self.peek() else {
            return Err((self.end_span(), "expected an expression".to_owned()));
        };
        let raw = token.raw;
        match raw {
            RawToken::Plus | RawToken::Minus | RawToken::Bang | RawToken::Tilde => {
                self.pos += 1;
                let value = self.unary()?;
                Ok(match raw {
                    RawToken::Minus => value.wrapping_neg(),
                    RawToken::Bang => i64::from(value == 0),
                    RawToken::Tilde => !value,
                    _ => value,
                })
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> EvalResult {
        let Some(token) = self.peek() else {
            return Err((self.end_span(), "expected an expression".to_owned()));
        };
        let span = token.span;
        match token.raw {
            RawToken::Number => {
                let text = self.interner.lookup(token.text);
                let value = match parse_number(text) {
                    Some(TokenKind::Int(v)) => i64::from(v),
                    Some(TokenKind::UInt(v)) => i64::from(v),
                    _ => return Err((span, format!("`{text}` is not an integer constant"))),
                };
                self.pos += 1;
                Ok(value)
            }
            RawToken::LParen => {
                self.pos += 1;
                let value = self.expression(0)?;
                match self.peek() {
                    Some(close) if close.raw == RawToken::RParen => {
                        self.pos += 1;
                        Ok(value)
                    }
                    Some(other) => Err((other.span, format!("expected `)`, found {}", self.describe(other)))),
                    None => Err((self.end_span(), "expected `)`".to_owned())),
                }
            }
            RawToken::Ident => Err((
                span,
                format!("undefined {} in preprocessor expression", self.describe(token)),
            )),
            _ => Err((span, format!("unexpected {}", self.describe(token)))),
        }
    }
}

/// `None` on division or remainder by zero.
fn apply_binary(op: RawToken, lhs: i64, rhs: i64) -> Option<i64> {
    let value = match op {
        RawToken::PipePipe => i64::from(lhs != 0 || rhs != 0),
        RawToken::AmpAmp => i64::from(lhs != 0 && rhs != 0),
        RawToken::Pipe => lhs | rhs,
        RawToken::Caret => lhs ^ rhs,
        RawToken::Amp => lhs & rhs,
        RawToken::EqEq => i64::from(lhs == rhs),
        RawToken::NotEq => i64::from(lhs != rhs),
        RawToken::Lt => i64::from(lhs < rhs),
        RawToken::Gt => i64::from(lhs > rhs),
        RawToken::LtEq => i64::from(lhs <= rhs),
        RawToken::GtEq => i64::from(lhs >= rhs),
        RawToken::Shl => lhs.wrapping_shl(u32::try_from(rhs & 63).unwrap_or(0)),
        RawToken::Shr => lhs.wrapping_shr(u32::try_from(rhs & 63).unwrap_or(0)),
        RawToken::Plus => lhs.wrapping_add(rhs),
        RawToken::Minus => lhs.wrapping_sub(rhs),
        RawToken::Star => lhs.wrapping_mul(rhs),
        RawToken::Slash => lhs.checked_div(rhs)?,
        RawToken::Percent => lhs.checked_rem(rhs)?,
        _ => return Some(lhs),
    };
    Some(value)
}
