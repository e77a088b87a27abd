//! Operator typing rules.
//!
//! GLSL ES 1.00 has no implicit conversions: operands must agree on their
//! element type, and scalars combine with vectors and matrices
//! component-wise.

use wgl_diagnostic::ErrorCode;
use wgl_ir::{BasicType, BinaryOp, MatrixType, StringInterner, Type, TypeKind, UnaryOp, VectorType};

use crate::types::{contains_array, contains_sampler, same_type};

/// A rejected operator application.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TypeOpError {
    pub message: String,
    pub code: ErrorCode,
}

impl TypeOpError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

#[derive(Copy, Clone)]
enum Shape {
    Scalar,
    Vector(VectorType),
    Matrix(MatrixType),
}

fn shape(ty: &Type) -> Option<Shape> {
    match ty.kind {
        TypeKind::Basic(b) if b != BasicType::Void => Some(Shape::Scalar),
        TypeKind::Vector(v) => Some(Shape::Vector(v)),
        TypeKind::Matrix(m) => Some(Shape::Matrix(m)),
        _ => None,
    }
}

/// Int or float scalar, vector or matrix.
fn is_arithmetic(ty: &Type) -> bool {
    shape(ty).is_some() && matches!(ty.element_type(), Some(BasicType::Int | BasicType::Float))
}

/// Result type of `lhs op rhs`.
pub fn check_binary_operation(
    op: BinaryOp,
    lhs: &Type,
    rhs: &Type,
    interner: &StringInterner,
) -> Result<Type, TypeOpError> {
    let describe = |ty: &Type| ty.describe(interner);
    let symbol = op.as_symbol();

    if op.is_arithmetic() {
        for ty in [lhs, rhs] {
            if shape(ty).is_none() {
                return Err(TypeOpError::new(
                    ErrorCode::E2012,
                    format!("operator `{symbol}` cannot be applied to `{}`", describe(ty)),
                ));
            }
            if !is_arithmetic(ty) {
                return Err(TypeOpError::new(
                    ErrorCode::E2011,
                    format!("operator `{symbol}` cannot be applied to `{}`", describe(ty)),
                ));
            }
        }
        if lhs.element_type() != rhs.element_type() {
            return Err(mismatch(symbol, &describe(lhs), &describe(rhs)));
        }
        let unsupported = || {
            TypeOpError::new(
                ErrorCode::E2009,
                format!(
                    "operator `{symbol}` cannot combine `{}` and `{}`",
                    describe(lhs),
                    describe(rhs)
                ),
            )
        };
        return match (shape(lhs), shape(rhs)) {
            (Some(Shape::Scalar), _) => Ok(rhs.unqualified()),
            (_, Some(Shape::Scalar)) => Ok(lhs.unqualified()),
            (Some(Shape::Vector(a)), Some(Shape::Vector(b))) if a == b => Ok(lhs.unqualified()),
            (Some(Shape::Matrix(a)), Some(Shape::Matrix(b))) if a == b => Ok(lhs.unqualified()),
            (Some(Shape::Vector(v)), Some(Shape::Matrix(m)))
                if op == BinaryOp::Mul && v.size == m.rows =>
            {
                Ok(Type::vector(BasicType::Float, m.columns))
            }
            (Some(Shape::Matrix(m)), Some(Shape::Vector(v)))
                if op == BinaryOp::Mul && v.size == m.columns =>
            {
                Ok(Type::vector(BasicType::Float, m.rows))
            }
            _ => Err(unsupported()),
        };
    }

    if op.is_relational() {
        for ty in [lhs, rhs] {
            let scalar = matches!(ty.kind, TypeKind::Basic(BasicType::Int | BasicType::Float));
            if !scalar {
                return Err(TypeOpError::new(
                    ErrorCode::E2011,
                    format!(
                        "operator `{symbol}` needs int or float scalars, found `{}`",
                        describe(ty)
                    ),
                ));
            }
        }
        if !same_type(lhs, rhs) {
            return Err(mismatch(symbol, &describe(lhs), &describe(rhs)));
        }
        return Ok(Type::bool());
    }

    if op.is_equality() {
        for ty in [lhs, rhs] {
            if contains_array(ty) || contains_sampler(ty) {
                return Err(TypeOpError::new(
                    ErrorCode::E2012,
                    format!("operator `{symbol}` cannot compare `{}` values", describe(ty)),
                ));
            }
            if ty.is_void() {
                return Err(TypeOpError::new(
                    ErrorCode::E2011,
                    format!("operator `{symbol}` cannot be applied to `void`"),
                ));
            }
        }
        if !same_type(lhs, rhs) {
            return Err(mismatch(symbol, &describe(lhs), &describe(rhs)));
        }
        return Ok(Type::bool());
    }

    for ty in [lhs, rhs] {
        if !ty.is_bool_scalar() {
            return Err(TypeOpError::new(
                ErrorCode::E2011,
                format!("operator `{symbol}` needs `bool` operands, found `{}`", describe(ty)),
            ));
        }
    }
    Ok(Type::bool())
}

fn mismatch(symbol: &str, lhs: &str, rhs: &str) -> TypeOpError {
    TypeOpError::new(
        ErrorCode::E2010,
        format!("mismatched operand types `{lhs}` and `{rhs}` for `{symbol}`"),
    )
}

/// Result type of a prefix or postfix operator; increments and decrements
/// share the `PreInc` / `PreDec` rule.
pub fn check_unary_operation(
    op: UnaryOp,
    operand: &Type,
    interner: &StringInterner,
) -> Result<Type, TypeOpError> {
    let ok = match op {
        UnaryOp::Neg | UnaryOp::Plus | UnaryOp::PreInc | UnaryOp::PreDec => is_arithmetic(operand),
        UnaryOp::Not => operand.is_bool_scalar(),
    };
    if ok {
        Ok(operand.unqualified())
    } else {
        Err(TypeOpError::new(
            ErrorCode::E2011,
            format!(
                "operator `{}` cannot be applied to `{}`",
                op.as_symbol(),
                operand.describe(interner)
            ),
        ))
    }
}
