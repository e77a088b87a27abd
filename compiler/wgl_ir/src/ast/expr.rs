//! Expression nodes.

use smallvec::SmallVec;

use super::{BinaryOp, Intrinsic, PostOp, Type, UnaryOp};
use crate::{ExprId, Name, Span};

/// Call arguments; most calls have four or fewer.
pub type ExprList = SmallVec<[ExprId; 4]>;

#[derive(Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Copy a leaf node.
    ///
    /// Only literals and variable references are leaves. Any other kind would
    /// alias child ids, which is an invariant violation: debug builds assert,
    /// release builds return `None`.
    pub fn clone_shallow(&self) -> Option<Expr> {
        match self.kind {
            ExprKind::Literal(_) | ExprKind::Var { .. } => Some(self.clone()),
            _ => {
                debug_assert!(false, "clone_shallow on a non-leaf expression");
                None
            }
        }
    }
}

/// Literal values.
#[derive(Clone, PartialEq, Debug)]
pub enum Literal {
    Float(f64),
    Int(i32),
    UInt(u32),
    Bool(bool),
    String(Name),
    /// A folded vector or matrix value, components in column-major order.
    Composite { ty: Box<Type>, values: Vec<f64> },
}

#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    Literal(Literal),
    /// Variable or function reference. Builtin functions carry their tag.
    Var {
        name: Name,
        intrinsic: Option<Intrinsic>,
    },
    /// Callee of a constructor call, e.g. the `vec3` in `vec3(1.0)`.
    TypeConstructor(Box<Type>),
    Call {
        callee: ExprId,
        args: ExprList,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Post {
        op: PostOp,
        operand: ExprId,
    },
    /// `lhs = rhs`, or `lhs op= rhs` when `op` is set.
    Assign {
        op: Option<BinaryOp>,
        lhs: ExprId,
        rhs: ExprId,
    },
    Conditional {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },
    Index {
        base: ExprId,
        index: ExprId,
    },
    /// Field access or swizzle.
    Select {
        base: ExprId,
        field: Name,
    },
    /// Comma operator.
    Sequence {
        lhs: ExprId,
        rhs: ExprId,
    },
}

impl ExprKind {
    /// Plain variable reference with no builtin tag.
    pub fn var(name: Name) -> Self {
        ExprKind::Var {
            name,
            intrinsic: None,
        }
    }

    pub fn float(value: f64) -> Self {
        ExprKind::Literal(Literal::Float(value))
    }

    pub fn int(value: i32) -> Self {
        ExprKind::Literal(Literal::Int(value))
    }
}
