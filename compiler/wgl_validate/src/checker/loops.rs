//! `for` loop restrictions (GLSL ES 1.00, Appendix A).
//!
//! A loop has one index of type `int` or `float`, initialized with a
//! constant, compared against a constant in the condition and stepped by a
//! constant in the update. The index is read-only in the body. Together these
//! make the trip count statically known, which is checked here as well.

use wgl_diagnostic::ErrorCode;
use wgl_ir::{
    BasicType, BinaryOp, Decl, DeclKind, ExprId, ExprKind, Name, PostOp, Span, StmtId, StmtKind,
    UnaryOp,
};

use super::Checker;
use crate::const_eval::ConstValue;

/// The declared loop index.
struct LoopIndex {
    /// Name in the source, used for lookups.
    source: Name,
    /// Name in the AST after aliasing.
    emitted: Name,
    start: Option<f64>,
}

/// `index op limit`, with the index moved to the left.
struct LoopBound {
    op: BinaryOp,
    limit: Option<f64>,
}

fn scalar_value(value: Option<ConstValue>) -> Option<f64> {
    value.and_then(|v| v.as_scalar()).map(|s| s.as_f64())
}

/// Whether `index op limit` holds.
fn compare(op: BinaryOp, index: f64, limit: f64) -> bool {
    match op {
        BinaryOp::Lt => index < limit,
        BinaryOp::Le => index <= limit,
        BinaryOp::Gt => index > limit,
        BinaryOp::Ge => index >= limit,
        BinaryOp::Eq => (index - limit).abs() < f64::EPSILON,
        _ => (index - limit).abs() >= f64::EPSILON,
    }
}

impl Checker<'_> {
    pub(crate) fn check_for(
        &mut self,
        init: StmtId,
        cond: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
        span: Span,
    ) {
        self.with_scope(|checker| {
            let index = checker.check_loop_init(init, span);

            let bound = match cond {
                Some(cond) => checker.check_loop_condition(cond, index.as_ref()),
                None => {
                    checker.error(ErrorCode::E2033, span, "`for` loop needs a condition");
                    None
                }
            };
            // Checked before the index turns read-only, since it writes it.
            let step = match update {
                Some(update) => checker.check_loop_update(update, index.as_ref()),
                None => {
                    checker.error(ErrorCode::E2034, span, "`for` loop needs an update expression");
                    None
                }
            };

            if let (Some(index), Some(bound), Some(step)) = (&index, &bound, step) {
                checker.check_termination(index, bound, step, span);
            }
            if let Some(index) = &index {
                for name in [index.source, index.emitted] {
                    if let Some(symbol) = checker.scopes.lookup_mut(name) {
                        symbol.loop_index = true;
                    }
                }
            }
            checker.with_loop(|checker| checker.check_substatement(body));
        });
    }

    fn check_loop_init(&mut self, init: StmtId, span: Span) -> Option<LoopIndex> {
        let source = match &self.unit.stmt(init).kind {
            StmtKind::Decl(decls) => match decls.as_slice() {
                [Decl {
                    kind: DeclKind::Var {
                        ty, name, init: Some(_),
                    },
                    ..
                }] => Some((*name, ty.clone())),
                _ => None,
            },
            _ => None,
        };
        self.check_stmt(init);

        let Some((source, declared)) = source else {
            self.error(
                ErrorCode::E2032,
                span,
                "`for` loop must declare and initialize exactly one index",
            );
            return None;
        };
        if !(declared.is_basic(BasicType::Int) || declared.is_basic(BasicType::Float)) {
            let message = format!(
                "loop index must be an `int` or a `float`, found `{}`",
                self.describe(&declared)
            );
            self.error(ErrorCode::E2032, span, message);
            return None;
        }
        // The declaration may have renamed the index.
        let (emitted, value) = match &self.unit.stmt(init).kind {
            StmtKind::Decl(decls) => match decls.first().map(|d| &d.kind) {
                Some(DeclKind::Var {
                    name,
                    init: Some(value),
                    ..
                }) => (*name, *value),
                _ => return None,
            },
            _ => return None,
        };
        self.scopes.lookup_local(source)?;
        if !self.is_constant(value, false) {
            self.error(
                ErrorCode::E2032,
                span,
                "loop index must be initialized with a constant expression",
            );
            return None;
        }
        Some(LoopIndex {
            source,
            emitted,
            start: scalar_value(self.eval_const(value)),
        })
    }

    fn is_loop_index(&self, expr: ExprId, index: &LoopIndex) -> bool {
        matches!(self.unit.expr(expr).kind, ExprKind::Var { name, .. } if name == index.emitted)
    }

    fn check_loop_condition(&mut self, cond: ExprId, index: Option<&LoopIndex>) -> Option<LoopBound> {
        let ty = self.check_expr(cond)?;
        let index = index?;
        let span = self.unit.expr(cond).span;
        let shape = match self.unit.expr(cond).kind.clone() {
            ExprKind::Binary { op, lhs, rhs } if op.is_relational() || op.is_equality() => {
                if self.is_loop_index(lhs, index) {
                    Some((op, rhs))
                } else if self.is_loop_index(rhs, index) {
                    Some((op.reversed(), lhs))
                } else {
                    None
                }
            }
            _ => None,
        };
        let Some((op, limit)) = shape.filter(|&(_, limit)| ty.is_bool_scalar() && self.is_constant(limit, false))
        else {
            self.error(
                ErrorCode::E2033,
                span,
                "loop condition must compare the loop index with a constant expression",
            );
            return None;
        };
        Some(LoopBound {
            op,
            limit: scalar_value(self.eval_const(limit)),
        })
    }

    /// The constant step of the update, `None` when it is invalid or could
    /// not be folded.
    fn check_loop_update(&mut self, update: ExprId, index: Option<&LoopIndex>) -> Option<f64> {
        self.check_expr(update)?;
        let index = index?;
        let span = self.unit.expr(update).span;
        let step = match self.unit.expr(update).kind.clone() {
            ExprKind::Post {
                op: PostOp::Inc,
                operand,
            }
            | ExprKind::Unary {
                op: UnaryOp::PreInc,
                operand,
            } if self.is_loop_index(operand, index) => Some(1.0),
            ExprKind::Post {
                op: PostOp::Dec,
                operand,
            }
            | ExprKind::Unary {
                op: UnaryOp::PreDec,
                operand,
            } if self.is_loop_index(operand, index) => Some(-1.0),
            ExprKind::Assign {
                op: Some(op @ (BinaryOp::Add | BinaryOp::Sub)),
                lhs,
                rhs,
            } if self.is_loop_index(lhs, index) => {
                if !self.is_constant(rhs, false) {
                    self.error(
                        ErrorCode::E2035,
                        span,
                        "loop index must be changed by a constant expression",
                    );
                    return None;
                }
                let amount = scalar_value(self.eval_const(rhs))?;
                if amount.abs() < f64::EPSILON {
                    self.error(
                        ErrorCode::E2035,
                        span,
                        "loop index must be changed by a nonzero amount",
                    );
                    return None;
                }
                Some(if op == BinaryOp::Sub { -amount } else { amount })
            }
            _ => None,
        };
        if step.is_none() {
            self.error(
                ErrorCode::E2035,
                span,
                "loop update must be `++`, `--`, `+=` or `-=` applied to the loop index",
            );
        }
        step
    }

    /// Reject a loop whose index moves away from its limit.
    fn check_termination(&mut self, index: &LoopIndex, bound: &LoopBound, step: f64, span: Span) {
        let (Some(start), Some(limit)) = (index.start, bound.limit) else {
            return;
        };
        if !compare(bound.op, start, limit) {
            // The body never runs.
            return;
        }
        let terminates = match bound.op {
            BinaryOp::Lt | BinaryOp::Le => step > 0.0,
            BinaryOp::Gt | BinaryOp::Ge => step < 0.0,
            BinaryOp::Ne => {
                let trips = (limit - start) / step;
                trips >= 0.0 && trips.fract().abs() < f64::EPSILON
            }
            _ => true,
        };
        if !terminates {
            self.error(
                ErrorCode::E2036,
                span,
                "`for` loop never terminates: the index moves away from its limit",
            );
        }
    }
}
