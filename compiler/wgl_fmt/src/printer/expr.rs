//! Expression rendering.

use wgl_ir::{
    Assoc, BasicType, ExprId, ExprKind, Literal, PrecAssoc, Precedence, Type, UnaryOp,
};
use wgl_stack::ensure_sufficient_stack;

use super::{Dialect, Printer};
use crate::Operand;

const PREFIX: PrecAssoc = PrecAssoc::new(Precedence::Prefix, Assoc::Right);

/// One folded component spelled as a literal of `element` type.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "folded integer components are exact"
)]
fn format_component(element: BasicType, value: f64) -> String {
    match element {
        BasicType::Bool => (value.abs() >= 0.5).to_string(),
        BasicType::Int => (value as i32).to_string(),
        BasicType::UInt => format!("{}u", value as u32),
        BasicType::Float | BasicType::Void => format_float(value),
    }
}

/// Float literal text that re-lexes as a float with the same value.
pub fn format_float(value: f64) -> String {
    debug_assert!(value.is_finite(), "non-finite float literal");
    let text = format!("{value:?}");
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        format!("{text}.0")
    }
}

impl<D: Dialect> Printer<'_, D> {
    /// Print `id` at statement level, where nothing needs grouping.
    pub fn print_expr_top(&mut self, id: ExprId) {
        self.print_expr_in(id, PrecAssoc::LOWEST);
    }

    /// Print `id` as the right operand of a `context` operator, as in an
    /// initializer (`PrecAssoc::ASSIGN`) or an array size
    /// (`PrecAssoc::COND`).
    pub fn print_expr_in(&mut self, id: ExprId, context: PrecAssoc) {
        self.scopes.enter_reset_scope(context);
        self.print_expr(id, Operand::Right);
        self.scopes.leave_reset_scope();
    }

    pub fn print_expr(&mut self, id: ExprId, operand: Operand) {
        ensure_sufficient_stack(|| {
            if !D::print_expr(self, id, operand) {
                self.print_expr_default(id, operand);
            }
        });
    }

    /// The shared rendering of `id`, bypassing the dialect.
    pub fn print_expr_default(&mut self, id: ExprId, operand: Operand) {
        let unit = self.unit;
        match &unit.expr(id).kind {
            ExprKind::Literal(literal) => self.print_literal(literal, operand),
            ExprKind::Var { name, .. } => self.emit_name(*name),
            ExprKind::TypeConstructor(ty) => self.print_type_specifier(ty),
            ExprKind::Call { callee, args } => {
                self.print_expr(*callee, Operand::Left);
                self.print_args(args);
            }
            ExprKind::Binary { op, lhs, rhs } => {
                self.print_binary(op.prec_assoc(), *lhs, op.as_symbol(), *rhs, operand);
            }
            ExprKind::Unary { op, operand: inner } => {
                self.print_prefix(op.as_symbol(), *inner, operand);
            }
            ExprKind::Post { op, operand: inner } => {
                self.enter_op_scope(op.prec_assoc(), operand);
                self.print_expr(*inner, Operand::Left);
                self.emit(op.as_symbol());
                self.leave_op_scope();
            }
            ExprKind::Assign { op, lhs, rhs } => {
                let symbol = match op {
                    Some(op) => format!("{}=", op.as_symbol()),
                    None => "=".to_owned(),
                };
                self.print_binary(PrecAssoc::ASSIGN, *lhs, &symbol, *rhs, operand);
            }
            ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                self.enter_op_scope(PrecAssoc::COND, operand);
                self.print_expr(*cond, Operand::Left);
                self.emit(" ? ");
                self.print_expr_top(*then_expr);
                self.emit(" : ");
                self.print_expr(*else_expr, Operand::Right);
                self.leave_op_scope();
            }
            ExprKind::Index { base, index } => {
                self.enter_op_scope(PrecAssoc::HIGHEST, operand);
                self.print_expr(*base, Operand::Left);
                self.emit("[");
                self.print_expr_top(*index);
                self.emit("]");
                self.leave_op_scope();
            }
            ExprKind::Select { base, field } => {
                self.enter_op_scope(PrecAssoc::HIGHEST, operand);
                self.print_expr(*base, Operand::Left);
                self.emit(".");
                self.emit_name(*field);
                self.leave_op_scope();
            }
            ExprKind::Sequence { lhs, rhs } => {
                self.print_binary(PrecAssoc::COMMA, *lhs, ",", *rhs, operand);
            }
        }
    }

    /// `lhs <symbol> rhs` under `op`. Commas get no leading space.
    pub fn print_binary(
        &mut self,
        op: PrecAssoc,
        lhs: ExprId,
        symbol: &str,
        rhs: ExprId,
        operand: Operand,
    ) {
        self.enter_op_scope(op, operand);
        self.print_expr(lhs, Operand::Left);
        if symbol != "," {
            self.emit(" ");
        }
        self.emit(symbol);
        self.emit(" ");
        self.print_expr(rhs, Operand::Right);
        self.leave_op_scope();
    }

    /// `<symbol>operand`, keeping `- -x` from lexing as `--x`.
    pub fn print_prefix(&mut self, symbol: &str, inner: ExprId, operand: Operand) {
        self.enter_op_scope(PREFIX, operand);
        self.emit(symbol);
        if let Some(sign) = self.leading_sign(inner) {
            if symbol.ends_with(sign) {
                self.emit(" ");
            }
        }
        self.print_expr(inner, Operand::Right);
        self.leave_op_scope();
    }

    /// `(arg, arg, ...)`
    pub fn print_args(&mut self, args: &[ExprId]) {
        self.enter_arg_list_scope();
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                self.emit(", ");
            }
            self.print_expr(arg, Operand::Right);
        }
        self.leave_arg_list_scope();
    }

    fn print_literal(&mut self, literal: &Literal, operand: Operand) {
        match literal {
            Literal::Float(value) => {
                self.print_signed(&format_float(*value), value.is_sign_negative(), operand);
            }
            // `-2147483648` would re-lex as the negation of an
            // out-of-range literal.
            Literal::Int(i32::MIN) => self.emit("0x80000000"),
            Literal::Int(value) => self.print_signed(&value.to_string(), *value < 0, operand),
            Literal::UInt(value) => self.emit_fmt(format_args!("{value}u")),
            Literal::Bool(value) => self.emit(if *value { "true" } else { "false" }),
            Literal::String(text) => {
                let text = self.name(*text);
                self.emit_fmt(format_args!("\"{text}\""));
            }
            Literal::Composite { ty, values } => self.print_composite(ty, values),
        }
    }

    fn print_signed(&mut self, text: &str, negative: bool, operand: Operand) {
        if negative {
            self.enter_op_scope(PREFIX, operand);
            self.emit(text);
            self.leave_op_scope();
        } else {
            self.emit(text);
        }
    }

    /// A folded vector or matrix value as a constructor call.
    fn print_composite(&mut self, ty: &Type, values: &[f64]) {
        self.print_type_specifier(ty);
        let element = ty.element_type().unwrap_or(BasicType::Float);
        let components: Vec<String> = values
            .iter()
            .map(|&value| format_component(element, value))
            .collect();
        self.emit("(");
        self.emit(&components.join(", "));
        self.emit(")");
    }

    /// The sign character `id` prints first, if it prints one unparenthesized.
    fn leading_sign(&self, id: ExprId) -> Option<char> {
        match &self.unit.expr(id).kind {
            ExprKind::Unary { op, .. } => match op {
                UnaryOp::Neg | UnaryOp::PreDec => Some('-'),
                UnaryOp::Plus | UnaryOp::PreInc => Some('+'),
                UnaryOp::Not => None,
            },
            ExprKind::Literal(Literal::Float(value)) if value.is_sign_negative() => Some('-'),
            ExprKind::Literal(Literal::Int(value)) if *value < 0 && *value != i32::MIN => {
                Some('-')
            }
            _ => None,
        }
    }
}
