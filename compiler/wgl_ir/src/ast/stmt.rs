//! Statement nodes.

use super::Decl;
use crate::{ExprId, Span, StmtId};

#[derive(Clone, PartialEq, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// Statements without operands.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum SimpleStmt {
    Empty,
    Break,
    Continue,
    Discard,
    /// `default:` label inside a switch body.
    Default,
}

impl SimpleStmt {
    pub const fn as_str(self) -> &'static str {
        match self {
            SimpleStmt::Empty => "",
            SimpleStmt::Break => "break",
            SimpleStmt::Continue => "continue",
            SimpleStmt::Discard => "discard",
            SimpleStmt::Default => "default",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// `{ ... }`
    Body(Vec<StmtId>),
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    For {
        /// A `Decl`, `Expr` or empty statement.
        init: StmtId,
        cond: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    Do {
        body: StmtId,
        cond: ExprId,
    },
    Switch {
        scrutinee: ExprId,
        /// Always a `Body`.
        body: StmtId,
    },
    /// `case <expr>:`
    Case(ExprId),
    Return(Option<ExprId>),
    Expr(ExprId),
    /// Local declarations; one entry per declarator.
    Decl(Vec<Decl>),
    Simple(SimpleStmt),
}
