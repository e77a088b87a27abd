//! Statements.

use wgl_diagnostic::ErrorCode;
use wgl_ir::{ExprId, SimpleStmt, Span, StmtId, StmtKind};
use wgl_stack::ensure_sufficient_stack;

use super::Checker;
use crate::types::{is_int_scalar, same_type};

impl Checker<'_> {
    pub(crate) fn check_stmt(&mut self, id: StmtId) {
        ensure_sufficient_stack(|| {
            let span = self.unit.stmt(id).span;
            // Taken out so declarations can be rewritten in place.
            let mut kind = std::mem::replace(
                &mut self.unit.stmts[id].kind,
                StmtKind::Simple(SimpleStmt::Empty),
            );
            self.check_stmt_kind(&mut kind, span);
            self.unit.stmts[id].kind = kind;
        });
    }

    fn check_stmt_kind(&mut self, kind: &mut StmtKind, span: Span) {
        match kind {
            StmtKind::Body(stmts) => self.with_scope(|checker| {
                for &stmt in stmts.iter() {
                    checker.check_stmt(stmt);
                }
            }),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.check_predicate(*cond, "if");
                self.check_substatement(*then_branch);
                if let Some(else_branch) = *else_branch {
                    self.check_substatement(else_branch);
                }
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => self.check_for(*init, *cond, *update, *body, span),
            StmtKind::While { cond, body } => {
                let body = *body;
                self.check_predicate(*cond, "while");
                self.with_loop(|checker| checker.check_substatement(body));
            }
            StmtKind::Do { body, cond } => {
                let body = *body;
                self.with_loop(|checker| checker.check_substatement(body));
                self.check_predicate(*cond, "do-while");
            }
            StmtKind::Switch { scrutinee, body } => self.check_switch(*scrutinee, *body, span),
            StmtKind::Case(label) => self.check_case(*label, span),
            StmtKind::Return(value) => self.check_return(*value, span),
            StmtKind::Expr(expr) => {
                let _ = self.check_expr(*expr);
            }
            StmtKind::Decl(decls) => {
                for decl in decls {
                    self.check_decl(decl);
                }
            }
            StmtKind::Simple(simple) => self.check_simple(*simple, span),
        }
    }

    /// The outermost statements of a function body, which share the
    /// parameters' scope.
    pub(crate) fn check_function_body(&mut self, body: StmtId) {
        let stmts = match &self.unit.stmt(body).kind {
            StmtKind::Body(stmts) => stmts.clone(),
            _ => vec![body],
        };
        for stmt in stmts {
            self.check_stmt(stmt);
        }
    }

    /// The branch of an `if` or the body of a loop. A single statement gets
    /// its own scope, as a compound statement would.
    pub(crate) fn check_substatement(&mut self, id: StmtId) {
        if matches!(self.unit.stmt(id).kind, StmtKind::Body(_)) {
            self.check_stmt(id);
        } else {
            self.with_scope(|checker| checker.check_stmt(id));
        }
    }

    fn check_predicate(&mut self, cond: ExprId, what: &str) {
        let Some(ty) = self.check_expr(cond) else {
            return;
        };
        if !ty.is_bool_scalar() {
            let span = self.unit.expr(cond).span;
            let message = format!(
                "`{what}` condition must be a `bool`, found `{}`",
                self.describe(&ty)
            );
            self.error(ErrorCode::E2029, span, message);
        }
    }

    fn check_switch(&mut self, scrutinee: ExprId, body: StmtId, span: Span) {
        if let Some(ty) = self.check_expr(scrutinee) {
            if !is_int_scalar(&ty) {
                let message = format!(
                    "switch expression must be an `int`, found `{}`",
                    self.describe(&ty)
                );
                self.error(ErrorCode::E2029, span, message);
            }
        }
        let starts_with_label = match &self.unit.stmt(body).kind {
            StmtKind::Body(stmts) => match stmts.first() {
                Some(&first) => matches!(
                    self.unit.stmt(first).kind,
                    StmtKind::Case(_) | StmtKind::Simple(SimpleStmt::Default)
                ),
                None => true,
            },
            _ => false,
        };
        if !starts_with_label {
            self.error(
                ErrorCode::E2031,
                span,
                "statements in a switch must follow a `case` or `default` label",
            );
        }
        self.with_switch(|checker| checker.check_stmt(body));
    }

    fn check_case(&mut self, label: ExprId, span: Span) {
        if self.switch_depth == 0 {
            self.error(ErrorCode::E2031, span, "`case` label outside of a switch");
            return;
        }
        let Some(ty) = self.check_expr(label) else {
            return;
        };
        if !is_int_scalar(&ty) {
            let message = format!("case label must be an `int`, found `{}`", self.describe(&ty));
            self.error(ErrorCode::E2010, span, message);
        } else if !self.is_constant(label, false) {
            self.error(
                ErrorCode::E2037,
                span,
                "case label must be a constant expression",
            );
        }
    }

    fn check_return(&mut self, value: Option<ExprId>, span: Span) {
        let Some(expected) = self.function.as_ref().map(|f| f.return_type.clone()) else {
            self.error(ErrorCode::E2031, span, "`return` outside of a function");
            return;
        };
        let Some(value) = value else {
            if !expected.is_void() {
                let message = format!(
                    "missing return value in function returning `{}`",
                    self.describe(&expected)
                );
                self.error(ErrorCode::E2010, span, message);
            }
            return;
        };
        let Some(actual) = self.check_expr(value) else {
            return;
        };
        if expected.is_void() {
            self.error(
                ErrorCode::E2010,
                span,
                "a `void` function cannot return a value",
            );
        } else if !same_type(&actual, &expected) {
            let message = format!(
                "returned value has type `{}`, expected `{}`",
                self.describe(&actual),
                self.describe(&expected)
            );
            self.error(ErrorCode::E2010, span, message);
        }
    }

    fn check_simple(&mut self, simple: SimpleStmt, span: Span) {
        match simple {
            SimpleStmt::Break if self.loop_depth == 0 && self.switch_depth == 0 => {
                self.error(ErrorCode::E2031, span, "`break` outside of a loop or switch");
            }
            SimpleStmt::Continue if self.loop_depth == 0 => {
                self.error(ErrorCode::E2031, span, "`continue` outside of a loop");
            }
            SimpleStmt::Discard if self.is_vertex() => {
                self.error(
                    ErrorCode::E2030,
                    span,
                    "`discard` is only allowed in fragment shaders",
                );
            }
            SimpleStmt::Default if self.switch_depth == 0 => {
                self.error(ErrorCode::E2031, span, "`default` label outside of a switch");
            }
            _ => {}
        }
    }

    /// Whether every path through `id` ends in `return` or `discard`.
    pub(crate) fn always_returns(&self, id: StmtId) -> bool {
        ensure_sufficient_stack(|| match &self.unit.stmt(id).kind {
            StmtKind::Return(_) | StmtKind::Simple(SimpleStmt::Discard) => true,
            StmtKind::Body(stmts) => stmts.iter().any(|&stmt| self.always_returns(stmt)),
            StmtKind::If {
                then_branch,
                else_branch: Some(else_branch),
                ..
            } => self.always_returns(*then_branch) && self.always_returns(*else_branch),
            StmtKind::Do { body, .. } => self.always_returns(*body),
            _ => false,
        })
    }
}
