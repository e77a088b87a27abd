//! Statements.

use wgl_ir::{ExprId, SimpleStmt, Span, StmtId, StmtKind, TokenKind};
use wgl_stack::ensure_sufficient_stack;

use crate::recovery::{synchronize, RecoverySet};
use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_statement(&mut self) -> Result<StmtId, ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<StmtId, ParseError> {
        match self.current_kind() {
            TokenKind::LBrace => self.parse_compound_statement(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Case => {
                let start = self.advance();
                let label = self.parse_expression()?;
                let end = self.expect(&TokenKind::Colon)?;
                Ok(self.alloc_stmt(StmtKind::Case(label), start.merge(end)))
            }
            TokenKind::Default => {
                let start = self.advance();
                let end = self.expect(&TokenKind::Colon)?;
                Ok(self.alloc_stmt(StmtKind::Simple(SimpleStmt::Default), start.merge(end)))
            }
            TokenKind::Return => {
                let start = self.advance();
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                let end = self.expect(&TokenKind::Semicolon)?;
                Ok(self.alloc_stmt(StmtKind::Return(value), start.merge(end)))
            }
            TokenKind::Break => self.parse_simple(SimpleStmt::Break),
            TokenKind::Continue => self.parse_simple(SimpleStmt::Continue),
            TokenKind::Discard => self.parse_simple(SimpleStmt::Discard),
            TokenKind::Semicolon => {
                let span = self.advance();
                Ok(self.alloc_stmt(StmtKind::Simple(SimpleStmt::Empty), span))
            }
            _ if self.at_declaration_start() => self.parse_declaration_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    #[inline]
    fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.unit.alloc_stmt(kind, span)
    }

    fn stmt_span(&self, id: StmtId) -> Span {
        self.unit.stmt(id).span
    }

    /// `break;`, `continue;`, `discard;`
    fn parse_simple(&mut self, simple: SimpleStmt) -> Result<StmtId, ParseError> {
        let start = self.advance();
        let end = self.expect(&TokenKind::Semicolon)?;
        Ok(self.alloc_stmt(StmtKind::Simple(simple), start.merge(end)))
    }

    /// `{ statement* }`. Errors inside the block are recorded and parsing
    /// resumes at the next statement.
    pub(crate) fn parse_compound_statement(&mut self) -> Result<StmtId, ParseError> {
        let start = self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let before = self.cursor.position();
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(error) => {
                    self.errors.push(error);
                    synchronize(&mut self.cursor, RecoverySet::Statement);
                }
            }
            if self.cursor.position() == before {
                self.advance();
            }
        }
        let end = self.expect(&TokenKind::RBrace)?;
        Ok(self.alloc_stmt(StmtKind::Body(body), start.merge(end)))
    }

    fn parse_declaration_statement(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        let decls = self.parse_declaration(false)?;
        let span = start.merge(self.previous_span());
        Ok(self.alloc_stmt(StmtKind::Decl(decls), span))
    }

    fn parse_expression_statement(&mut self) -> Result<StmtId, ParseError> {
        let expr = self.parse_expression()?;
        let end = self.expect(&TokenKind::Semicolon)?;
        let span = self.expr_span(expr).merge(end);
        Ok(self.alloc_stmt(StmtKind::Expr(expr), span))
    }

    /// `( expression )`
    fn parse_paren_condition(&mut self) -> Result<ExprId, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(cond)
    }

    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.advance();
        let cond = self.parse_paren_condition()?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(self.parse_statement()?)
        } else {
            None
        };
        let end = self.stmt_span(else_branch.unwrap_or(then_branch));
        Ok(self.alloc_stmt(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            start.merge(end),
        ))
    }

    /// `for ( init cond? ; update? ) body`. The init statement carries its
    /// own `;`; an empty init is a `Simple(Empty)` statement.
    fn parse_for(&mut self) -> Result<StmtId, ParseError> {
        let start = self.advance();
        self.expect(&TokenKind::LParen)?;
        let init = if self.check(&TokenKind::Semicolon) {
            let span = self.advance();
            self.alloc_stmt(StmtKind::Simple(SimpleStmt::Empty), span)
        } else if self.at_declaration_start() {
            self.parse_declaration_statement()?
        } else {
            self.parse_expression_statement()?
        };
        let cond = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_statement()?;
        let span = start.merge(self.stmt_span(body));
        Ok(self.alloc_stmt(
            StmtKind::For {
                init,
                cond,
                update,
                body,
            },
            span,
        ))
    }

    fn parse_while(&mut self) -> Result<StmtId, ParseError> {
        let start = self.advance();
        let cond = self.parse_paren_condition()?;
        let body = self.parse_statement()?;
        let span = start.merge(self.stmt_span(body));
        Ok(self.alloc_stmt(StmtKind::While { cond, body }, span))
    }

    fn parse_do(&mut self) -> Result<StmtId, ParseError> {
        let start = self.advance();
        let body = self.parse_statement()?;
        self.expect(&TokenKind::While)?;
        let cond = self.parse_paren_condition()?;
        let end = self.expect(&TokenKind::Semicolon)?;
        Ok(self.alloc_stmt(StmtKind::Do { body, cond }, start.merge(end)))
    }

    fn parse_switch(&mut self) -> Result<StmtId, ParseError> {
        let start = self.advance();
        let scrutinee = self.parse_paren_condition()?;
        let body = self.parse_compound_statement()?;
        let span = start.merge(self.stmt_span(body));
        Ok(self.alloc_stmt(StmtKind::Switch { scrutinee, body }, span))
    }
}
