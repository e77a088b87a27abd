//! Statements.
//!
//! Statements print from the current position without a trailing newline.
//! Blocks put each child on its own line, one level deeper.

use wgl_ir::{SimpleStmt, StmtId, StmtKind};

use super::{Dialect, Printer};

impl<D: Dialect> Printer<'_, D> {
    pub fn print_stmt(&mut self, id: StmtId) {
        let unit = self.unit;
        match &unit.stmt(id).kind {
            StmtKind::Body(stmts) => self.print_block(stmts),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.emit("if (");
                self.print_expr_top(*cond);
                self.emit(")");
                let braced = self.print_substmt(*then_branch);
                if let Some(else_branch) = else_branch {
                    self.print_continuation(braced, "else");
                    if matches!(unit.stmt(*else_branch).kind, StmtKind::If { .. }) {
                        self.emit(" ");
                        self.print_stmt(*else_branch);
                    } else {
                        self.print_substmt(*else_branch);
                    }
                }
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                self.emit("for (");
                self.print_stmt(*init);
                if let Some(cond) = cond {
                    self.emit(" ");
                    self.print_expr_top(*cond);
                }
                self.emit(";");
                if let Some(update) = update {
                    self.emit(" ");
                    self.print_expr_top(*update);
                }
                self.emit(")");
                self.print_substmt(*body);
            }
            StmtKind::While { cond, body } => {
                self.emit("while (");
                self.print_expr_top(*cond);
                self.emit(")");
                self.print_substmt(*body);
            }
            StmtKind::Do { body, cond } => {
                self.emit("do");
                let braced = self.print_substmt(*body);
                self.print_continuation(braced, "while (");
                self.print_expr_top(*cond);
                self.emit(");");
            }
            StmtKind::Switch { scrutinee, body } => {
                self.emit("switch (");
                self.print_expr_top(*scrutinee);
                self.emit(") ");
                self.print_stmt(*body);
            }
            StmtKind::Case(expr) => {
                self.emit("case ");
                self.print_expr_top(*expr);
                self.emit(":");
            }
            StmtKind::Return(value) => {
                self.emit("return");
                if let Some(value) = value {
                    self.emit(" ");
                    self.print_expr_top(*value);
                }
                self.emit(";");
            }
            StmtKind::Expr(expr) => {
                self.print_expr_top(*expr);
                self.emit(";");
            }
            StmtKind::Decl(decls) => self.print_decl_group(decls),
            StmtKind::Simple(SimpleStmt::Default) => self.emit("default:"),
            StmtKind::Simple(simple) => {
                self.emit(simple.as_str());
                self.emit(";");
            }
        }
    }

    /// `{`, one line per statement, `}`.
    pub fn print_block(&mut self, stmts: &[StmtId]) {
        self.emit("{");
        self.newline();
        self.indent();
        for &stmt in stmts {
            self.start_line();
            self.print_stmt(stmt);
            self.newline();
        }
        self.dedent();
        self.start_line();
        self.emit("}");
    }

    /// The body of a control statement: a block on the same line, anything
    /// else indented on the next. Returns whether it was a block.
    fn print_substmt(&mut self, id: StmtId) -> bool {
        let unit = self.unit;
        if let StmtKind::Body(stmts) = &unit.stmt(id).kind {
            self.emit(" ");
            self.print_block(stmts);
            return true;
        }
        self.newline();
        self.indent();
        self.start_line();
        self.print_stmt(id);
        self.dedent();
        false
    }

    /// `} else` after a block, or `else` on its own line.
    fn print_continuation(&mut self, after_block: bool, keyword: &str) {
        if after_block {
            self.emit(" ");
        } else {
            self.newline();
            self.start_line();
        }
        self.emit(keyword);
    }
}
