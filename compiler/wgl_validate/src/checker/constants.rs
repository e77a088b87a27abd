//! Constant expressions over the arena.
//!
//! `is_constant` is the structural test of GLSL ES section 5.10;
//! `eval_const` folds what it can. An expression can be constant and still
//! not fold, for example a call to an unfolded builtin.

use wgl_ir::{BinaryOp, ExprId, ExprKind, Literal, Type, TypeKind};
use wgl_stack::ensure_sufficient_stack;

use super::expr::swizzle_components;
use super::Checker;
use crate::const_eval::{construct, fold_binary, fold_intrinsic, fold_unary, ConstValue, Scalar};

fn literal_value(literal: &Literal) -> Option<ConstValue> {
    match literal {
        Literal::Float(v) => Some(ConstValue::scalar(Scalar::Float(*v))),
        Literal::Int(v) => Some(ConstValue::scalar(Scalar::Int(*v))),
        Literal::Bool(v) => Some(ConstValue::scalar(Scalar::Bool(*v))),
        Literal::Composite { ty, values } => {
            let element = ty.element_type()?;
            let components = values
                .iter()
                .map(|&v| Scalar::Float(v).convert(element))
                .collect::<Option<Vec<_>>>()?;
            Some(ConstValue::from_components(components))
        }
        Literal::UInt(_) | Literal::String(_) => None,
    }
}

impl Checker<'_> {
    /// Whether `id` is a constant expression. With `allow_loop_index`, loop
    /// indices count as well, giving the constant-index-expressions of
    /// Appendix A.
    pub(crate) fn is_constant(&self, id: ExprId, allow_loop_index: bool) -> bool {
        ensure_sufficient_stack(|| {
            let constant = |e: ExprId| self.is_constant(e, allow_loop_index);
            match &self.unit.expr(id).kind {
                ExprKind::Literal(Literal::String(_)) => false,
                ExprKind::Literal(_) => true,
                ExprKind::Var { name, .. } => self
                    .scopes
                    .lookup(*name)
                    .is_some_and(|s| s.is_const || (allow_loop_index && s.loop_index)),
                ExprKind::Call { callee, args } => {
                    let foldable = match &self.unit.expr(*callee).kind {
                        ExprKind::TypeConstructor(_) => true,
                        ExprKind::Var {
                            intrinsic: Some(intrinsic),
                            ..
                        } => !intrinsic.is_texture_lookup() && !intrinsic.requires_derivatives(),
                        _ => false,
                    };
                    foldable && args.iter().all(|&arg| constant(arg))
                }
                ExprKind::Binary { lhs, rhs, .. } => constant(*lhs) && constant(*rhs),
                ExprKind::Unary { op, operand } => !op.is_increment() && constant(*operand),
                ExprKind::Conditional {
                    cond,
                    then_expr,
                    else_expr,
                } => constant(*cond) && constant(*then_expr) && constant(*else_expr),
                ExprKind::Select { base, .. } => constant(*base),
                ExprKind::Index { base, index } => constant(*base) && constant(*index),
                ExprKind::TypeConstructor(_)
                | ExprKind::Post { .. }
                | ExprKind::Assign { .. }
                | ExprKind::Sequence { .. } => false,
            }
        })
    }

    /// Fold a checked expression. Uses the recorded types, so call only
    /// after `check_expr`.
    pub(crate) fn eval_const(&self, id: ExprId) -> Option<ConstValue> {
        ensure_sufficient_stack(|| match &self.unit.expr(id).kind {
            ExprKind::Literal(literal) => literal_value(literal),
            ExprKind::Var { name, .. } => self.scopes.lookup(*name)?.value.clone(),
            ExprKind::Unary { op, operand } => fold_unary(*op, &self.eval_const(*operand)?),
            ExprKind::Binary { op, lhs, rhs } => {
                let is_matrix = |e: ExprId| self.types.get(e).is_some_and(Type::is_matrix);
                // Linear-algebra products are not component-wise.
                if *op == BinaryOp::Mul && (is_matrix(*lhs) || is_matrix(*rhs)) {
                    return None;
                }
                fold_binary(*op, &self.eval_const(*lhs)?, &self.eval_const(*rhs)?)
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                if self.eval_const(*cond)?.as_bool()? {
                    self.eval_const(*then_expr)
                } else {
                    self.eval_const(*else_expr)
                }
            }
            ExprKind::Call { callee, args } => {
                let values = args
                    .iter()
                    .map(|&arg| self.eval_const(arg))
                    .collect::<Option<Vec<_>>>()?;
                match &self.unit.expr(*callee).kind {
                    ExprKind::TypeConstructor(_) => construct(self.types.get(*callee)?, &values),
                    ExprKind::Var {
                        intrinsic: Some(intrinsic),
                        ..
                    } => fold_intrinsic(*intrinsic, &values),
                    _ => None,
                }
            }
            ExprKind::Select { base, field } => {
                let size = self.types.get(*base)?.as_vector()?.size;
                let components = swizzle_components(self.name_str(*field), size).ok()?;
                self.eval_const(*base)?.select(&components)
            }
            ExprKind::Index { base, index } => {
                let position = usize::try_from(self.eval_const(*index)?.as_int()?).ok()?;
                let value = self.eval_const(*base)?;
                match &self.types.get(*base)?.kind {
                    TypeKind::Vector(_) => value.select(&[position]),
                    TypeKind::Matrix(m) => value.column(position, usize::from(m.rows)),
                    _ => None,
                }
            }
            _ => None,
        })
    }
}
