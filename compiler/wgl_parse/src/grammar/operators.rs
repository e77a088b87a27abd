//! Operator matching helpers.

use wgl_diagnostic::ErrorCode;
use wgl_ir::{BinaryOp, PostOp, TokenKind, UnaryOp};

use crate::{ParseError, Parser};

pub(crate) fn match_or_op(kind: TokenKind) -> Option<BinaryOp> {
    (kind == TokenKind::PipePipe).then_some(BinaryOp::Or)
}

pub(crate) fn match_xor_op(kind: TokenKind) -> Option<BinaryOp> {
    (kind == TokenKind::CaretCaret).then_some(BinaryOp::Xor)
}

pub(crate) fn match_and_op(kind: TokenKind) -> Option<BinaryOp> {
    (kind == TokenKind::AmpAmp).then_some(BinaryOp::And)
}

pub(crate) fn match_equality_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::Ne),
        _ => None,
    }
}

pub(crate) fn match_relational_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::LtEq => Some(BinaryOp::Le),
        TokenKind::GtEq => Some(BinaryOp::Ge),
        _ => None,
    }
}

pub(crate) fn match_additive_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        _ => None,
    }
}

pub(crate) fn match_multiplicative_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        _ => None,
    }
}

pub(crate) fn match_unary_op(kind: TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Bang => Some(UnaryOp::Not),
        TokenKind::PlusPlus => Some(UnaryOp::PreInc),
        TokenKind::MinusMinus => Some(UnaryOp::PreDec),
        _ => None,
    }
}

pub(crate) fn match_post_op(kind: TokenKind) -> Option<PostOp> {
    match kind {
        TokenKind::PlusPlus => Some(PostOp::Inc),
        TokenKind::MinusMinus => Some(PostOp::Dec),
        _ => None,
    }
}

/// `=` yields `Some(None)`; a compound assignment yields its operator.
pub(crate) fn match_assign_op(kind: TokenKind) -> Option<Option<BinaryOp>> {
    match kind {
        TokenKind::Eq => Some(None),
        TokenKind::PlusEq => Some(Some(BinaryOp::Add)),
        TokenKind::MinusEq => Some(Some(BinaryOp::Sub)),
        TokenKind::StarEq => Some(Some(BinaryOp::Mul)),
        TokenKind::SlashEq => Some(Some(BinaryOp::Div)),
        _ => None,
    }
}

/// Operators GLSL ES 1.00 lexes but reserves.
fn reserved_operator(kind: TokenKind) -> Option<&'static str> {
    Some(match kind {
        TokenKind::Percent => "%",
        TokenKind::Tilde => "~",
        TokenKind::Amp => "&",
        TokenKind::Pipe => "|",
        TokenKind::Caret => "^",
        TokenKind::Shl => "<<",
        TokenKind::Shr => ">>",
        TokenKind::PercentEq => "%=",
        TokenKind::ShlEq => "<<=",
        TokenKind::ShrEq => ">>=",
        TokenKind::AmpEq => "&=",
        TokenKind::CaretEq => "^=",
        TokenKind::PipeEq => "|=",
        _ => return None,
    })
}

impl Parser<'_> {
    /// Fail if the current token is a reserved operator.
    pub(crate) fn reject_reserved_operator(&self) -> Result<(), ParseError> {
        match reserved_operator(self.current_kind()) {
            Some(symbol) => Err(ParseError::new(
                ErrorCode::E1006,
                format!("operator `{symbol}` is reserved"),
                self.current_span(),
            )
            .with_context("reserved operator")
            .with_help("GLSL ES 1.00 reserves this operator for future use")),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_assign_ops() {
        assert_eq!(match_assign_op(TokenKind::Eq), Some(None));
        assert_eq!(match_assign_op(TokenKind::SlashEq), Some(Some(BinaryOp::Div)));
        assert_eq!(match_assign_op(TokenKind::PercentEq), None);
        assert_eq!(reserved_operator(TokenKind::PercentEq), Some("%="));
    }

    #[test]
    fn test_relational_mapping() {
        assert_eq!(match_relational_op(TokenKind::LtEq), Some(BinaryOp::Le));
        assert_eq!(match_relational_op(TokenKind::EqEq), None);
        assert_eq!(match_equality_op(TokenKind::NotEq), Some(BinaryOp::Ne));
    }
}
