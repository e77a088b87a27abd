//! Constant folding.
//!
//! Values are flat component lists in column-major order, so vectors and
//! matrices fold component-wise with scalar broadcasting. Folding is best
//! effort: `None` means "not folded", never "not constant". Whether an
//! expression is constant is decided structurally by the checker.

use smallvec::{smallvec, SmallVec};
use wgl_ir::{BasicType, BinaryOp, Intrinsic, Type, TypeKind, UnaryOp};

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Scalar {
    Bool(bool),
    Int(i32),
    Float(f64),
}

impl Scalar {
    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::Bool(b) => f64::from(u8::from(b)),
            Scalar::Int(i) => f64::from(i),
            Scalar::Float(f) => f,
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "GLSL int conversion truncates toward zero"
    )]
    pub fn as_i32(self) -> i32 {
        match self {
            Scalar::Bool(b) => i32::from(b),
            Scalar::Int(i) => i,
            Scalar::Float(f) => f as i32,
        }
    }

    pub fn as_bool(self) -> bool {
        match self {
            Scalar::Bool(b) => b,
            Scalar::Int(i) => i != 0,
            Scalar::Float(f) => f != 0.0,
        }
    }

    /// Constructor conversion, as in `int(2.5)` or `bool(1)`.
    pub fn convert(self, to: BasicType) -> Option<Scalar> {
        match to {
            BasicType::Bool => Some(Scalar::Bool(self.as_bool())),
            BasicType::Int => Some(Scalar::Int(self.as_i32())),
            BasicType::Float => Some(Scalar::Float(self.as_f64())),
            BasicType::Void | BasicType::UInt => None,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct ConstValue {
    components: SmallVec<[Scalar; 4]>,
}

impl ConstValue {
    pub fn scalar(value: Scalar) -> Self {
        ConstValue {
            components: smallvec![value],
        }
    }

    pub fn from_components(components: impl IntoIterator<Item = Scalar>) -> Self {
        ConstValue {
            components: components.into_iter().collect(),
        }
    }

    pub fn components(&self) -> &[Scalar] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn as_scalar(&self) -> Option<Scalar> {
        match self.components.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self.as_scalar()? {
            Scalar::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.as_scalar()? {
            Scalar::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.as_scalar()? {
            Scalar::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Pick components by index, for swizzles and vector indexing.
    pub fn select(&self, indices: &[usize]) -> Option<ConstValue> {
        indices
            .iter()
            .map(|&i| self.components.get(i).copied())
            .collect::<Option<SmallVec<_>>>()
            .map(|components| ConstValue { components })
    }

    /// Column `column` of a matrix with `rows` rows.
    pub fn column(&self, column: usize, rows: usize) -> Option<ConstValue> {
        let start = column * rows;
        let slice = self.components.get(start..start + rows)?;
        Some(ConstValue::from_components(slice.iter().copied()))
    }
}

pub fn fold_unary(op: UnaryOp, value: &ConstValue) -> Option<ConstValue> {
    let map = |f: fn(Scalar) -> Option<Scalar>| {
        value
            .components
            .iter()
            .map(|&c| f(c))
            .collect::<Option<SmallVec<_>>>()
            .map(|components| ConstValue { components })
    };
    match op {
        UnaryOp::Plus => Some(value.clone()),
        UnaryOp::Neg => map(|c| match c {
            Scalar::Int(i) => Some(Scalar::Int(i.wrapping_neg())),
            Scalar::Float(f) => Some(Scalar::Float(-f)),
            Scalar::Bool(_) => None,
        }),
        UnaryOp::Not => map(|c| match c {
            Scalar::Bool(b) => Some(Scalar::Bool(!b)),
            _ => None,
        }),
        UnaryOp::PreInc | UnaryOp::PreDec => None,
    }
}

/// Fold a binary operator. Matrix products are not folded; the caller
/// filters them out since only types tell `m * m` from `v * v`.
pub fn fold_binary(op: BinaryOp, lhs: &ConstValue, rhs: &ConstValue) -> Option<ConstValue> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
            zip_with(lhs, rhs, |a, b| arithmetic(op, a, b))
        }
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => {
            let (a, b) = (lhs.as_scalar()?, rhs.as_scalar()?);
            let ordering = match (a, b) {
                (Scalar::Int(x), Scalar::Int(y)) => x.partial_cmp(&y),
                (Scalar::Float(x), Scalar::Float(y)) => x.partial_cmp(&y),
                _ => None,
            }?;
            let result = match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Gt => ordering.is_gt(),
                BinaryOp::Le => ordering.is_le(),
                _ => ordering.is_ge(),
            };
            Some(ConstValue::scalar(Scalar::Bool(result)))
        }
        BinaryOp::Eq | BinaryOp::Ne => {
            if lhs.len() != rhs.len() {
                return None;
            }
            let equal = lhs.components == rhs.components;
            Some(ConstValue::scalar(Scalar::Bool(equal == (op == BinaryOp::Eq))))
        }
        BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => {
            let (a, b) = (lhs.as_bool()?, rhs.as_bool()?);
            let result = match op {
                BinaryOp::And => a && b,
                BinaryOp::Or => a || b,
                _ => a != b,
            };
            Some(ConstValue::scalar(Scalar::Bool(result)))
        }
    }
}

fn arithmetic(op: BinaryOp, a: Scalar, b: Scalar) -> Option<Scalar> {
    match (a, b) {
        (Scalar::Int(x), Scalar::Int(y)) => match op {
            BinaryOp::Add => Some(Scalar::Int(x.wrapping_add(y))),
            BinaryOp::Sub => Some(Scalar::Int(x.wrapping_sub(y))),
            BinaryOp::Mul => Some(Scalar::Int(x.wrapping_mul(y))),
            BinaryOp::Div => x.checked_div(y).map(Scalar::Int),
            _ => None,
        },
        (Scalar::Float(x), Scalar::Float(y)) => match op {
            BinaryOp::Add => Some(Scalar::Float(x + y)),
            BinaryOp::Sub => Some(Scalar::Float(x - y)),
            BinaryOp::Mul => Some(Scalar::Float(x * y)),
            BinaryOp::Div => Some(Scalar::Float(x / y)),
            _ => None,
        },
        _ => None,
    }
}

/// Component-wise combination, broadcasting a single-component side.
fn zip_with(
    lhs: &ConstValue,
    rhs: &ConstValue,
    f: impl Fn(Scalar, Scalar) -> Option<Scalar>,
) -> Option<ConstValue> {
    let len = match (lhs.len(), rhs.len()) {
        (l, r) if l == r => l,
        (1, r) => r,
        (l, 1) => l,
        _ => return None,
    };
    let at = |v: &ConstValue, i: usize| {
        if v.len() == 1 {
            v.components[0]
        } else {
            v.components[i]
        }
    };
    (0..len)
        .map(|i| f(at(lhs, i), at(rhs, i)))
        .collect::<Option<SmallVec<_>>>()
        .map(|components| ConstValue { components })
}

/// Fold a constructor call `target(args...)`.
pub fn construct(target: &Type, args: &[ConstValue]) -> Option<ConstValue> {
    let flat = || args.iter().flat_map(|a| a.components.iter().copied());
    match &target.kind {
        TypeKind::Basic(basic) => {
            let first = flat().next()?;
            first.convert(*basic).map(ConstValue::scalar)
        }
        TypeKind::Vector(vector) => {
            let size = usize::from(vector.size);
            let components: Option<SmallVec<_>> = match args {
                [single] if single.len() == 1 => {
                    let value = single.components[0].convert(vector.element)?;
                    Some(smallvec![value; size])
                }
                _ => flat().take(size).map(|c| c.convert(vector.element)).collect(),
            };
            let components = components?;
            (components.len() == size).then_some(ConstValue { components })
        }
        TypeKind::Matrix(matrix) => {
            let (columns, rows) = (usize::from(matrix.columns), usize::from(matrix.rows));
            match args {
                [single] if single.len() == 1 => {
                    let diagonal = single.components[0].as_f64();
                    let components = (0..columns * rows).map(|i| {
                        let value = if i / rows == i % rows { diagonal } else { 0.0 };
                        Scalar::Float(value)
                    });
                    Some(ConstValue::from_components(components))
                }
                [single] if single.len() == columns * rows => Some(single.clone()),
                [_] => None,
                _ => {
                    let components: SmallVec<[Scalar; 4]> = flat()
                        .take(columns * rows)
                        .map(|c| Scalar::Float(c.as_f64()))
                        .collect();
                    (components.len() == columns * rows).then_some(ConstValue { components })
                }
            }
        }
        _ => None,
    }
}

/// Fold a builtin function of constant arguments.
///
/// Covers the component-wise float builtins and the geometric reductions;
/// everything else is left unfolded.
pub fn fold_intrinsic(intrinsic: Intrinsic, args: &[ConstValue]) -> Option<ConstValue> {
    if args
        .iter()
        .any(|a| a.components.iter().any(|c| !matches!(c, Scalar::Float(_))))
    {
        return None;
    }
    match (intrinsic, args) {
        (_, [x]) => {
            if let Some(f) = unary_float_fn(intrinsic) {
                return map_float(x, f);
            }
            match intrinsic {
                Intrinsic::Length => Some(float(dot(x, x)?.sqrt())),
                Intrinsic::Normalize => {
                    let length = dot(x, x)?.sqrt();
                    map_float(x, move |v| v / length)
                }
                _ => None,
            }
        }
        (_, [x, y]) => match intrinsic {
            Intrinsic::Atan => zip_float(x, y, f64::atan2),
            Intrinsic::Pow => zip_float(x, y, f64::powf),
            Intrinsic::Mod => zip_float(x, y, |a, b| a - b * (a / b).floor()),
            Intrinsic::Min => zip_float(x, y, f64::min),
            Intrinsic::Max => zip_float(x, y, f64::max),
            Intrinsic::Step => zip_float(x, y, |edge, v| if v < edge { 0.0 } else { 1.0 }),
            Intrinsic::Dot => Some(float(dot(x, y)?)),
            Intrinsic::Distance => {
                let diff = zip_float(x, y, |a, b| a - b)?;
                Some(float(dot(&diff, &diff)?.sqrt()))
            }
            _ => None,
        },
        (Intrinsic::Clamp, [x, lo, hi]) => {
            let lower = zip_float(x, lo, f64::max)?;
            zip_float(&lower, hi, f64::min)
        }
        (Intrinsic::Mix, [x, y, a]) => {
            let delta = zip_float(y, x, |b, a| b - a)?;
            let scaled = zip_float(&delta, a, |d, t| d * t)?;
            zip_float(x, &scaled, |a, b| a + b)
        }
        _ => None,
    }
}

fn unary_float_fn(intrinsic: Intrinsic) -> Option<fn(f64) -> f64> {
    let f: fn(f64) -> f64 = match intrinsic {
        Intrinsic::Radians => f64::to_radians,
        Intrinsic::Degrees => f64::to_degrees,
        Intrinsic::Sin => f64::sin,
        Intrinsic::Cos => f64::cos,
        Intrinsic::Tan => f64::tan,
        Intrinsic::Asin => f64::asin,
        Intrinsic::Acos => f64::acos,
        Intrinsic::Atan => f64::atan,
        Intrinsic::Exp => f64::exp,
        Intrinsic::Log => f64::ln,
        Intrinsic::Exp2 => f64::exp2,
        Intrinsic::Log2 => f64::log2,
        Intrinsic::Sqrt => f64::sqrt,
        Intrinsic::Inversesqrt => |v| 1.0 / v.sqrt(),
        Intrinsic::Abs => f64::abs,
        Intrinsic::Sign => |v| {
            if v > 0.0 {
                1.0
            } else if v < 0.0 {
                -1.0
            } else {
                0.0
            }
        },
        Intrinsic::Floor => f64::floor,
        Intrinsic::Ceil => f64::ceil,
        Intrinsic::Fract => |v| v - v.floor(),
        _ => return None,
    };
    Some(f)
}

fn float(value: f64) -> ConstValue {
    ConstValue::scalar(Scalar::Float(value))
}

fn map_float(value: &ConstValue, f: impl Fn(f64) -> f64) -> Option<ConstValue> {
    Some(ConstValue::from_components(
        value.components.iter().map(|c| Scalar::Float(f(c.as_f64()))),
    ))
}

fn zip_float(lhs: &ConstValue, rhs: &ConstValue, f: impl Fn(f64, f64) -> f64) -> Option<ConstValue> {
    zip_with(lhs, rhs, |a, b| Some(Scalar::Float(f(a.as_f64(), b.as_f64()))))
}

fn dot(lhs: &ConstValue, rhs: &ConstValue) -> Option<f64> {
    if lhs.len() != rhs.len() {
        return None;
    }
    Some(
        lhs.components
            .iter()
            .zip(&rhs.components)
            .map(|(a, b)| a.as_f64() * b.as_f64())
            .sum(),
    )
}
