//! Conversion of expanded preprocessing tokens into parser tokens.

use wgl_ir::{StringInterner, TokenKind};

use crate::keywords::{self, Word};
use crate::number::parse_number;
use crate::preprocess::PpToken;
use crate::raw_token::RawToken;
use crate::LexErrorKind;

/// Convert a raw token to a `TokenKind`, resolving keywords and literals.
pub(crate) fn convert_token(
    token: &PpToken,
    interner: &StringInterner,
) -> Result<TokenKind, LexErrorKind> {
    let kind = match token.raw {
        RawToken::Ident => {
            let text = interner.lookup(token.text);
            match keywords::lookup(text) {
                Word::Keyword(kind) => kind,
                Word::Ident => TokenKind::Ident(token.text),
                Word::Reserved => return Err(LexErrorKind::ReservedWord(text.to_owned())),
            }
        }
        RawToken::Number => {
            let text = interner.lookup(token.text);
            return parse_number(text).ok_or_else(|| LexErrorKind::InvalidNumber(text.to_owned()));
        }
        RawToken::Newline | RawToken::Hash => {
            return Err(LexErrorKind::DirectiveSyntax(
                "`#` is only allowed at the start of a directive line".into(),
            ))
        }
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Question => TokenKind::Question,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Bang => TokenKind::Bang,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::CaretCaret => TokenKind::CaretCaret,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Shl => TokenKind::Shl,
        RawToken::Shr => TokenKind::Shr,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::Eq => TokenKind::Eq,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::ShlEq => TokenKind::ShlEq,
        RawToken::ShrEq => TokenKind::ShrEq,
        RawToken::AmpEq => TokenKind::AmpEq,
        RawToken::CaretEq => TokenKind::CaretEq,
        RawToken::PipeEq => TokenKind::PipeEq,
    };
    Ok(kind)
}
