//! Raw Token Definition
//!
//! The `RawToken` enum is the logos-derived preprocessing token before macro
//! expansion, keyword lookup and number parsing. Numbers are lexed as
//! C-style pp-numbers and validated afterwards, so `08` or `1.0e` are one
//! malformed token rather than two well-formed ones.

use logos::Logos;

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\x0B\x0C]+")] // Skip horizontal whitespace
pub(crate) enum RawToken {
    #[token("\n")]
    Newline,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"([0-9]|\.[0-9])([0-9a-zA-Z_.]|[eE][+-])*")]
    Number,

    #[token("#")]
    Hash,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("?")]
    Question,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("^^")]
    CaretCaret,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("&=")]
    AmpEq,
    #[token("^=")]
    CaretEq,
    #[token("|=")]
    PipeEq,
}

impl RawToken {
    /// Source text of punctuators; empty for tokens that carry their own.
    pub(crate) fn punct_str(self) -> &'static str {
        match self {
            RawToken::Newline | RawToken::Ident | RawToken::Number => "",
            RawToken::Hash => "#",
            RawToken::LParen => "(",
            RawToken::RParen => ")",
            RawToken::LBracket => "[",
            RawToken::RBracket => "]",
            RawToken::LBrace => "{",
            RawToken::RBrace => "}",
            RawToken::Dot => ".",
            RawToken::Comma => ",",
            RawToken::Colon => ":",
            RawToken::Semicolon => ";",
            RawToken::Question => "?",
            RawToken::Plus => "+",
            RawToken::Minus => "-",
            RawToken::Star => "*",
            RawToken::Slash => "/",
            RawToken::Percent => "%",
            RawToken::Bang => "!",
            RawToken::Tilde => "~",
            RawToken::Lt => "<",
            RawToken::Gt => ">",
            RawToken::LtEq => "<=",
            RawToken::GtEq => ">=",
            RawToken::EqEq => "==",
            RawToken::NotEq => "!=",
            RawToken::AmpAmp => "&&",
            RawToken::PipePipe => "||",
            RawToken::CaretCaret => "^^",
            RawToken::Amp => "&",
            RawToken::Pipe => "|",
            RawToken::Caret => "^",
            RawToken::Shl => "<<",
            RawToken::Shr => ">>",
            RawToken::PlusPlus => "++",
            RawToken::MinusMinus => "--",
            RawToken::Eq => "=",
            RawToken::PlusEq => "+=",
            RawToken::MinusEq => "-=",
            RawToken::StarEq => "*=",
            RawToken::SlashEq => "/=",
            RawToken::PercentEq => "%=",
            RawToken::ShlEq => "<<=",
            RawToken::ShrEq => ">>=",
            RawToken::AmpEq => "&=",
            RawToken::CaretEq => "^=",
            RawToken::PipeEq => "|=",
        }
    }
}
