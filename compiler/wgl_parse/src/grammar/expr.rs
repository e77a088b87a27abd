//! Expression parsing.
//!
//! One function per precedence level, from `,` down to primaries. The binary
//! levels share [`Parser::parse_binary_level`]. Parenthesized expressions
//! leave no node behind; printers put parentheses back from precedence.

use wgl_diagnostic::ErrorCode;
use wgl_ir::{
    BinaryOp, ExprId, ExprKind, ExprList, Intrinsic, Literal, Name, TokenKind, Type, TypeKeyword,
};
use wgl_stack::ensure_sufficient_stack;

use super::operators::{
    match_additive_op, match_and_op, match_assign_op, match_equality_op,
    match_multiplicative_op, match_or_op, match_post_op, match_relational_op, match_unary_op,
    match_xor_op,
};
use crate::{ParseError, Parser};

impl<'a> Parser<'a> {
    /// `expression`: assignments joined by `,`.
    pub(crate) fn parse_expression(&mut self) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_assignment()?;
        while self.eat(&TokenKind::Comma) {
            let rhs = self.parse_assignment()?;
            lhs = self.merge_node(ExprKind::Sequence { lhs, rhs }, lhs, rhs);
        }
        Ok(lhs)
    }

    /// `conditional [assign-op assignment]`, right associative.
    pub(crate) fn parse_assignment(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment_inner())
    }

    fn parse_assignment_inner(&mut self) -> Result<ExprId, ParseError> {
        let lhs = self.parse_conditional()?;
        // Every binary level stops at a reserved operator, so this is the
        // one place that sees it.
        self.reject_reserved_operator()?;
        let Some(op) = match_assign_op(self.current_kind()) else {
            return Ok(lhs);
        };
        self.advance();
        let rhs = self.parse_assignment()?;
        Ok(self.merge_node(ExprKind::Assign { op, lhs, rhs }, lhs, rhs))
    }

    /// `logical-or [? expression : assignment]`
    pub(crate) fn parse_conditional(&mut self) -> Result<ExprId, ParseError> {
        let cond = self.parse_logical_or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(cond);
        }
        let then_expr = self.parse_expression()?;
        self.expect(&TokenKind::Colon)?;
        let else_expr = self.parse_assignment()?;
        Ok(self.merge_node(
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            },
            cond,
            else_expr,
        ))
    }

    /// One left-associative binary level.
    fn parse_binary_level(
        &mut self,
        operand: for<'p> fn(&'p mut Parser<'a>) -> Result<ExprId, ParseError>,
        matcher: fn(TokenKind) -> Option<BinaryOp>,
    ) -> Result<ExprId, ParseError> {
        let mut lhs = operand(self)?;
        while let Some(op) = matcher(self.current_kind()) {
            self.advance();
            let rhs = operand(self)?;
            lhs = self.merge_node(ExprKind::Binary { op, lhs, rhs }, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_logical_or(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_logical_xor, match_or_op)
    }

    fn parse_logical_xor(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_logical_and, match_xor_op)
    }

    fn parse_logical_and(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_equality, match_and_op)
    }

    fn parse_equality(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_relational, match_equality_op)
    }

    fn parse_relational(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_additive, match_relational_op)
    }

    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_multiplicative, match_additive_op)
    }

    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary_level(Self::parse_unary, match_multiplicative_op)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        ensure_sufficient_stack(|| self.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> Result<ExprId, ParseError> {
        self.reject_reserved_operator()?;
        let Some(op) = match_unary_op(self.current_kind()) else {
            return self.parse_postfix();
        };
        let start = self.advance();
        let operand = self.parse_unary()?;
        let span = start.merge(self.expr_span(operand));
        Ok(self.alloc_expr(ExprKind::Unary { op, operand }, span))
    }

    /// Indexing, field selection and postfix `++`/`--`.
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            let start = self.expr_span(expr);
            match self.current_kind() {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expression()?;
                    let end = self.expect(&TokenKind::RBracket)?;
                    expr = self.alloc_expr(ExprKind::Index { base: expr, index }, start.merge(end));
                }
                TokenKind::Dot => {
                    self.advance();
                    let (field, end) = self.expect_ident().map_err(|e| {
                        e.with_context("expected field name or swizzle")
                    })?;
                    let field = self.rewrite_texcoord_swizzle(field);
                    expr = self.alloc_expr(ExprKind::Select { base: expr, field }, start.merge(end));
                }
                kind => {
                    let Some(op) = match_post_op(kind) else {
                        return Ok(expr);
                    };
                    let end = self.advance();
                    expr = self.alloc_expr(ExprKind::Post { op, operand: expr }, start.merge(end));
                }
            }
        }
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let span = self.current_span();
        let literal = match self.current_kind() {
            TokenKind::Int(v) => Literal::Int(v),
            TokenKind::UInt(v) => Literal::UInt(v),
            TokenKind::Float(bits) => Literal::Float(f64::from_bits(bits)),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Ident(name) => return self.parse_identifier(name),
            TokenKind::Type(keyword) => return self.parse_constructor(keyword),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::Eof => {
                return Err(ParseError::new(
                    ErrorCode::E1007,
                    "expected expression, found end of input",
                    span,
                ));
            }
            kind => {
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!("expected expression, found {}", kind.display_name()),
                    span,
                )
                .with_context("expected expression"));
            }
        };
        self.advance();
        Ok(self.alloc_expr(ExprKind::Literal(literal), span))
    }

    /// A variable, a function call, or a struct constructor.
    fn parse_identifier(&mut self, name: Name) -> Result<ExprId, ParseError> {
        let span = self.advance();
        let is_call = self.check(&TokenKind::LParen);
        if is_call && self.struct_names.contains(&name) {
            let callee = self.alloc_expr(ExprKind::TypeConstructor(Box::new(Type::named(name))), span);
            return self.parse_call(callee);
        }
        // Only callees are tagged: a local `float min;` is just a variable.
        let intrinsic = if is_call {
            Intrinsic::from_name(self.interner.lookup(name))
        } else {
            None
        };
        let var = self.alloc_expr(ExprKind::Var { name, intrinsic }, span);
        if is_call {
            self.parse_call(var)
        } else {
            Ok(var)
        }
    }

    /// `vec4(...)` and friends.
    fn parse_constructor(&mut self, keyword: TypeKeyword) -> Result<ExprId, ParseError> {
        let span = self.advance();
        if !self.check(&TokenKind::LParen) {
            return Err(ParseError::new(
                ErrorCode::E1002,
                format!(
                    "expected `(` after `{}` in constructor, found {}",
                    keyword.as_str(),
                    self.current_kind().display_name()
                ),
                self.current_span(),
            )
            .with_context("expected `(`"));
        }
        let callee = self.alloc_expr(ExprKind::TypeConstructor(Box::new(Type::new(keyword.to_kind()))), span);
        self.parse_call(callee)
    }

    /// `( )`, `( void )`, or a comma-separated argument list.
    fn parse_call(&mut self, callee: ExprId) -> Result<ExprId, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = ExprList::new();
        if self.current_kind() == TokenKind::Type(TypeKeyword::Void)
            && self.peek_kind(1) == TokenKind::RParen
        {
            self.advance();
        }
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_assignment()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let end = self.expect(&TokenKind::RParen)?;
        let span = self.expr_span(callee).merge(end);
        Ok(self.alloc_expr(ExprKind::Call { callee, args }, span))
    }

    fn merge_node(&mut self, kind: ExprKind, first: ExprId, last: ExprId) -> ExprId {
        let span = self.expr_span(first).merge(self.expr_span(last));
        self.alloc_expr(kind, span)
    }

    /// `v.stpq` becomes `v.xyzw` when texcoord rewriting is on.
    fn rewrite_texcoord_swizzle(&mut self, field: Name) -> Name {
        if !self.options.rewrite_texcoords {
            return field;
        }
        let text = self.interner.lookup(field);
        if text.is_empty()
            || text.len() > 4
            || !text.bytes().all(|b| matches!(b, b's' | b't' | b'p' | b'q'))
        {
            return field;
        }
        let rewritten: String = text
            .bytes()
            .map(|b| match b {
                b's' => 'x',
                b't' => 'y',
                b'p' => 'z',
                _ => 'w',
            })
            .collect();
        self.interner.intern_owned(rewritten)
    }
}
