//! Translation choices for calls.
//!
//! Builtin calls and constructors are classified once here; helper
//! discovery and emission both use the same classification, so a helper is
//! emitted exactly when some call prints its name.

use wgl_ir::{BasicType, BinaryOp, ExprId, ExprTypes, Intrinsic, Type, TypeKind};

use crate::helpers::Helpers;

/// A texture lookup after overload resolution.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TextureOp {
    Tex2D,
    Tex2DBias,
    Tex2DProj3,
    Tex2DProj3Bias,
    Tex2DProj4,
    Tex2DProj4Bias,
    Tex2DLod,
    Tex2DProj3Lod,
    Tex2DProj4Lod,
    TexCube,
    TexCubeBias,
    TexCubeLod,
}

impl TextureOp {
    /// The lookup `intrinsic` performs with `args`. Projective lookups
    /// depend on the coordinate size; a third argument to a non-lod lookup
    /// is a bias.
    pub fn resolve(intrinsic: Intrinsic, args: &[ExprId], types: &ExprTypes) -> Option<TextureOp> {
        let biased = args.len() == 3;
        let proj4 = args
            .get(1)
            .and_then(|&coord| types.get(coord))
            .and_then(Type::as_vector)
            .is_some_and(|v| v.size == 4);
        Some(match intrinsic {
            Intrinsic::Texture2D if biased => TextureOp::Tex2DBias,
            Intrinsic::Texture2D => TextureOp::Tex2D,
            Intrinsic::Texture2DProj => match (proj4, biased) {
                (false, false) => TextureOp::Tex2DProj3,
                (false, true) => TextureOp::Tex2DProj3Bias,
                (true, false) => TextureOp::Tex2DProj4,
                (true, true) => TextureOp::Tex2DProj4Bias,
            },
            Intrinsic::Texture2DLod => TextureOp::Tex2DLod,
            Intrinsic::Texture2DProjLod if proj4 => TextureOp::Tex2DProj4Lod,
            Intrinsic::Texture2DProjLod => TextureOp::Tex2DProj3Lod,
            Intrinsic::TextureCube if biased => TextureOp::TexCubeBias,
            Intrinsic::TextureCube => TextureOp::TexCube,
            Intrinsic::TextureCubeLod => TextureOp::TexCubeLod,
            _ => return None,
        })
    }

    /// The helper implementing this lookup, or `None` when the target has
    /// a native function for it.
    pub fn helper(self) -> Option<Helpers> {
        Some(match self {
            TextureOp::Tex2D | TextureOp::Tex2DProj4 | TextureOp::TexCube => return None,
            TextureOp::Tex2DBias => Helpers::TEX2D_BIAS,
            TextureOp::Tex2DProj3 => Helpers::TEX2D_PROJ3,
            TextureOp::Tex2DProj3Bias => Helpers::TEX2D_PROJ3_BIAS,
            TextureOp::Tex2DProj4Bias => Helpers::TEX2D_PROJ4_BIAS,
            TextureOp::Tex2DLod => Helpers::TEX2D_LOD,
            TextureOp::Tex2DProj3Lod => Helpers::TEX2D_PROJ3_LOD,
            TextureOp::Tex2DProj4Lod => Helpers::TEX2D_PROJ4_LOD,
            TextureOp::TexCubeBias => Helpers::TEXCUBE_BIAS,
            TextureOp::TexCubeLod => Helpers::TEXCUBE_LOD,
        })
    }

    /// Direct3D 9 intrinsic for the lookups without a helper.
    pub fn native_name(self) -> &'static str {
        match self {
            TextureOp::Tex2DProj4 => "tex2Dproj",
            _ if self.is_cube() => "texCUBE",
            _ => "tex2D",
        }
    }

    pub fn is_cube(self) -> bool {
        matches!(
            self,
            TextureOp::TexCube | TextureOp::TexCubeBias | TextureOp::TexCubeLod
        )
    }

    pub fn is_bias(self) -> bool {
        matches!(
            self,
            TextureOp::Tex2DBias
                | TextureOp::Tex2DProj3Bias
                | TextureOp::Tex2DProj4Bias
                | TextureOp::TexCubeBias
        )
    }

    pub fn is_lod(self) -> bool {
        matches!(
            self,
            TextureOp::Tex2DLod
                | TextureOp::Tex2DProj3Lod
                | TextureOp::Tex2DProj4Lod
                | TextureOp::TexCubeLod
        )
    }

    pub fn is_proj3(self) -> bool {
        matches!(
            self,
            TextureOp::Tex2DProj3 | TextureOp::Tex2DProj3Bias | TextureOp::Tex2DProj3Lod
        )
    }

    pub fn is_proj4(self) -> bool {
        matches!(
            self,
            TextureOp::Tex2DProj4 | TextureOp::Tex2DProj4Bias | TextureOp::Tex2DProj4Lod
        )
    }
}

/// How a builtin function call prints.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CallForm {
    /// A call of the HLSL function with this name, arguments unchanged.
    Rename(&'static str),
    /// A call of a generated helper.
    Helper(Helpers),
    /// `x - y * floor(x / y)`, for operands of the same shape.
    ModInline,
    /// Component-wise comparison as a binary operator.
    Relational(BinaryOp),
    /// `not(v)` as `!v`.
    Not,
    /// `equal` through a helper, negated for `notEqual`.
    VectorEqual { helper: Helpers, negate: bool },
    Texture(TextureOp),
}

impl CallForm {
    /// The helper this form calls, if any.
    pub fn helper(self) -> Option<Helpers> {
        match self {
            CallForm::Helper(helper) | CallForm::VectorEqual { helper, .. } => Some(helper),
            CallForm::Texture(op) => op.helper(),
            CallForm::Rename(_) | CallForm::ModInline | CallForm::Relational(_) | CallForm::Not => {
                None
            }
        }
    }
}

fn arg_type<'t>(types: &'t ExprTypes, args: &[ExprId], index: usize) -> Option<&'t Type> {
    args.get(index).and_then(|&arg| types.get(arg))
}

fn vector_size(ty: Option<&Type>) -> Option<u8> {
    ty.and_then(Type::as_vector).map(|v| v.size)
}

fn is_scalar(ty: Option<&Type>) -> bool {
    ty.is_some_and(Type::is_scalar)
}

/// Classify a call of `intrinsic` with `args`.
pub fn call_form(intrinsic: Intrinsic, args: &[ExprId], types: &ExprTypes) -> CallForm {
    let arg = |index| arg_type(types, args, index);
    // A vector first operand mixed with a scalar at `scalar_at`.
    let widened = |scalar_at: usize| match vector_size(arg(0)) {
        Some(size) if is_scalar(arg(scalar_at)) => Some(size),
        _ => None,
    };

    if let Some(op) = TextureOp::resolve(intrinsic, args, types) {
        return CallForm::Texture(op);
    }
    if let Some(op) = intrinsic.relational_op() {
        return CallForm::Relational(op);
    }
    match intrinsic {
        Intrinsic::Atan if args.len() == 2 => CallForm::Rename("atan2"),
        Intrinsic::Fract => CallForm::Rename("frac"),
        Intrinsic::Inversesqrt => CallForm::Rename("rsqrt"),
        Intrinsic::DFdx => CallForm::Rename("ddx"),
        Intrinsic::DFdy => CallForm::Rename("ddy"),
        Intrinsic::Mod => match widened(1) {
            Some(size) => CallForm::Helper(Helpers::modulo(size)),
            None => CallForm::ModInline,
        },
        Intrinsic::Min => widened(1).map_or(CallForm::Rename("min"), |n| {
            CallForm::Helper(Helpers::min(n))
        }),
        Intrinsic::Max => widened(1).map_or(CallForm::Rename("max"), |n| {
            CallForm::Helper(Helpers::max(n))
        }),
        Intrinsic::Clamp => widened(1).map_or(CallForm::Rename("clamp"), |n| {
            CallForm::Helper(Helpers::clamp(n))
        }),
        Intrinsic::Mix => widened(2).map_or(CallForm::Rename("lerp"), |n| {
            CallForm::Helper(Helpers::lerp(n))
        }),
        Intrinsic::Step => match vector_size(arg(1)) {
            Some(size) if is_scalar(arg(0)) => CallForm::Helper(Helpers::step(size)),
            _ => CallForm::Rename("step"),
        },
        Intrinsic::Smoothstep => match vector_size(arg(2)) {
            Some(size) if is_scalar(arg(0)) => CallForm::Helper(Helpers::smoothstep(size)),
            _ => CallForm::Rename("smoothstep"),
        },
        Intrinsic::MatrixCompMult => {
            let columns = arg(0).and_then(Type::as_matrix).map_or(2, |m| m.columns);
            CallForm::Helper(Helpers::matrix_comp_mult(columns))
        }
        Intrinsic::Equal | Intrinsic::NotEqual => {
            let vector = arg(0).and_then(Type::as_vector);
            let (element, size) = vector.map_or((BasicType::Float, 2), |v| (v.element, v.size));
            CallForm::VectorEqual {
                helper: Helpers::equal(element, size),
                negate: intrinsic == Intrinsic::NotEqual,
            }
        }
        Intrinsic::Not => CallForm::Not,
        other => CallForm::Rename(other.name()),
    }
}

/// How a constructor call prints.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ConstructorForm {
    /// HLSL accepts the GLSL form once the type is renamed.
    AsIs,
    /// One scalar spread over a vector: `((float3)(x))`.
    Replicate,
    /// Vector arguments overflowing a vector target, built at the wider
    /// size and swizzled down: `float3(float4(a, b).xyz)`.
    Widen(u8),
    /// More components than the target holds: the arguments are split into
    /// pieces and the surplus is dropped, as in `float2((v).xy)`.
    Trim,
    /// One scalar on the diagonal: `((x) * float2x2(1.0, 0.0, 0.0, 1.0))`.
    ScaledIdentity,
    /// A larger matrix keeps its upper-left corner: `((float2x2)(m))`.
    MatrixCast,
    /// A smaller matrix through a helper.
    MatrixUpsize(Helpers),
}

/// Classify a constructor producing `target` from `args`.
pub fn constructor_form(target: &Type, args: &[ExprId], types: &ExprTypes) -> ConstructorForm {
    let Some(arg_types) = args
        .iter()
        .map(|&arg| types.get(arg))
        .collect::<Option<Vec<&Type>>>()
    else {
        return ConstructorForm::AsIs;
    };
    let target_size = target.size();
    let total: u32 = arg_types.iter().map(|ty| ty.size()).sum();

    match (&target.kind, arg_types.as_slice()) {
        (TypeKind::Vector(_), [only]) if only.is_scalar() => ConstructorForm::Replicate,
        (TypeKind::Matrix(_), [only]) if only.is_scalar() => ConstructorForm::ScaledIdentity,
        (TypeKind::Matrix(to), [only]) if only.is_matrix() => {
            let from = only.as_matrix().map_or(to.columns, |m| m.columns);
            if from >= to.columns {
                ConstructorForm::MatrixCast
            } else {
                Helpers::matrix_upsize(from, to.columns)
                    .map_or(ConstructorForm::AsIs, ConstructorForm::MatrixUpsize)
            }
        }
        (TypeKind::Basic(_), [only]) if only.is_scalar() => ConstructorForm::AsIs,
        (TypeKind::Vector(_), [_, _, ..])
            if total > target_size && total <= 4 && !arg_types.iter().any(|ty| ty.is_matrix()) =>
        {
            ConstructorForm::Widen(u8::try_from(total).unwrap_or(4))
        }
        _ if total > target_size => ConstructorForm::Trim,
        _ => ConstructorForm::AsIs,
    }
}

/// One argument, or one matrix column, contributing components to a
/// trimmed constructor.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Piece {
    pub arg: ExprId,
    /// Column of a matrix argument.
    pub column: Option<u8>,
    /// Components to take; fewer than the piece holds means a swizzle.
    pub take: u8,
    /// Components the piece holds.
    pub holds: u8,
}

/// Split `args` into the pieces filling a `target_size`-component value.
pub fn trim_pieces(target_size: u32, args: &[ExprId], types: &ExprTypes) -> Vec<Piece> {
    let mut remaining = target_size;
    let mut pieces = Vec::new();
    for &arg in args {
        let Some(ty) = types.get(arg) else {
            continue;
        };
        let columns: Vec<(Option<u8>, u8)> = match ty.as_matrix() {
            Some(m) => (0..m.columns).map(|c| (Some(c), m.rows)).collect(),
            None => vec![(None, u8::try_from(ty.size()).unwrap_or(4))],
        };
        for (column, holds) in columns {
            if remaining == 0 {
                return pieces;
            }
            let take = u8::try_from(remaining.min(u32::from(holds))).unwrap_or(holds);
            remaining -= u32::from(take);
            pieces.push(Piece {
                arg,
                column,
                take,
                holds,
            });
        }
    }
    pieces
}

/// The swizzle selecting the first `take` components.
pub fn leading_swizzle(take: u8) -> &'static str {
    match take {
        1 => "x",
        2 => "xy",
        3 => "xyz",
        _ => "xyzw",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wgl_ir::{Span, TranslationUnit};

    use super::*;

    fn typed_args(tys: &[Type]) -> (Vec<ExprId>, ExprTypes) {
        let mut unit = TranslationUnit::new();
        let mut types = ExprTypes::new();
        let ids = tys
            .iter()
            .map(|ty| {
                let id = unit.alloc_expr(wgl_ir::ExprKind::float(0.0), Span::DUMMY);
                types.set(id, ty.clone());
                id
            })
            .collect();
        (ids, types)
    }

    fn vec(n: u8) -> Type {
        Type::vector(BasicType::Float, n)
    }

    #[test]
    fn test_common_functions_pick_helpers_for_mixed_operands() {
        let (args, types) = typed_args(&[vec(3), Type::float()]);
        assert_eq!(
            call_form(Intrinsic::Mod, &args, &types),
            CallForm::Helper(Helpers::MOD_FVEC3)
        );
        assert_eq!(
            call_form(Intrinsic::Min, &args, &types),
            CallForm::Helper(Helpers::MIN_FVEC3)
        );

        let (args, types) = typed_args(&[vec(2), vec(2)]);
        assert_eq!(call_form(Intrinsic::Mod, &args, &types), CallForm::ModInline);
        assert_eq!(call_form(Intrinsic::Max, &args, &types), CallForm::Rename("max"));

        let (args, types) = typed_args(&[vec(4), vec(4), Type::float()]);
        assert_eq!(
            call_form(Intrinsic::Mix, &args, &types),
            CallForm::Helper(Helpers::LERP_FVEC4)
        );

        let (args, types) = typed_args(&[Type::float(), vec(2)]);
        assert_eq!(
            call_form(Intrinsic::Step, &args, &types),
            CallForm::Helper(Helpers::STEP_FVEC2)
        );
    }

    #[test]
    fn test_renames() {
        let (one, types) = typed_args(&[Type::float()]);
        assert_eq!(call_form(Intrinsic::Fract, &one, &types), CallForm::Rename("frac"));
        assert_eq!(call_form(Intrinsic::Atan, &one, &types), CallForm::Rename("atan"));
        assert_eq!(call_form(Intrinsic::Sin, &one, &types), CallForm::Rename("sin"));
        let (two, types) = typed_args(&[Type::float(), Type::float()]);
        assert_eq!(call_form(Intrinsic::Atan, &two, &types), CallForm::Rename("atan2"));
        assert_eq!(call_form(Intrinsic::Mix, &two, &types), CallForm::Rename("lerp"));
    }

    #[test]
    fn test_vector_relational() {
        let (args, types) = typed_args(&[
            Type::vector(BasicType::Int, 3),
            Type::vector(BasicType::Int, 3),
        ]);
        assert_eq!(
            call_form(Intrinsic::NotEqual, &args, &types),
            CallForm::VectorEqual {
                helper: Helpers::EQUAL_IVEC3,
                negate: true
            }
        );
        assert_eq!(
            call_form(Intrinsic::LessThan, &args, &types),
            CallForm::Relational(BinaryOp::Lt)
        );
    }

    #[test]
    fn test_texture_resolution() {
        let sampler = Type::sampler(wgl_ir::SamplerKind::Sampler2D);
        let (args, types) = typed_args(&[sampler.clone(), vec(3)]);
        assert_eq!(
            TextureOp::resolve(Intrinsic::Texture2DProj, &args, &types),
            Some(TextureOp::Tex2DProj3)
        );
        let (args, types) = typed_args(&[sampler.clone(), vec(4), Type::float()]);
        assert_eq!(
            TextureOp::resolve(Intrinsic::Texture2DProj, &args, &types),
            Some(TextureOp::Tex2DProj4Bias)
        );
        let (args, types) = typed_args(&[sampler, vec(2)]);
        let op = TextureOp::resolve(Intrinsic::Texture2D, &args, &types);
        assert_eq!(op, Some(TextureOp::Tex2D));
        assert_eq!(op.and_then(TextureOp::helper), None);
        assert_eq!(TextureOp::Tex2DProj3.helper(), Some(Helpers::TEX2D_PROJ3));
    }

    #[test]
    fn test_constructor_forms() {
        let (args, types) = typed_args(&[Type::float()]);
        assert_eq!(constructor_form(&vec(3), &args, &types), ConstructorForm::Replicate);
        assert_eq!(
            constructor_form(&Type::matrix(2, 2), &args, &types),
            ConstructorForm::ScaledIdentity
        );
        assert_eq!(constructor_form(&Type::int(), &args, &types), ConstructorForm::AsIs);

        let (args, types) = typed_args(&[vec(4)]);
        assert_eq!(constructor_form(&vec(2), &args, &types), ConstructorForm::Trim);
        assert_eq!(constructor_form(&Type::float(), &args, &types), ConstructorForm::Trim);
        assert_eq!(constructor_form(&vec(4), &args, &types), ConstructorForm::AsIs);

        let (args, types) = typed_args(&[Type::matrix(2, 2)]);
        assert_eq!(
            constructor_form(&Type::matrix(3, 3), &args, &types),
            ConstructorForm::MatrixUpsize(Helpers::MAT2_TO_MAT3)
        );
        let (args, types) = typed_args(&[Type::matrix(4, 4)]);
        assert_eq!(
            constructor_form(&Type::matrix(3, 3), &args, &types),
            ConstructorForm::MatrixCast
        );

        let (args, types) = typed_args(&[vec(3), vec(3)]);
        assert_eq!(constructor_form(&vec(4), &args, &types), ConstructorForm::Trim);
        let (args, types) = typed_args(&[vec(2), vec(2)]);
        assert_eq!(constructor_form(&vec(4), &args, &types), ConstructorForm::AsIs);
        assert_eq!(constructor_form(&vec(3), &args, &types), ConstructorForm::Widen(4));
    }

    #[test]
    fn test_same_size_matrix_copy_is_cast() {
        for size in [2, 3, 4] {
            let (args, types) = typed_args(&[Type::matrix(size, size)]);
            assert_eq!(
                constructor_form(&Type::matrix(size, size), &args, &types),
                ConstructorForm::MatrixCast
            );
        }
    }

    #[test]
    fn test_trim_pieces_split_matrix_columns() {
        let (args, types) = typed_args(&[Type::matrix(3, 3), vec(2)]);
        let pieces = trim_pieces(4, &args, &types);
        assert_eq!(pieces.len(), 2);
        assert_eq!((pieces[0].column, pieces[0].take, pieces[0].holds), (Some(0), 3, 3));
        assert_eq!((pieces[1].column, pieces[1].take, pieces[1].holds), (Some(1), 1, 3));
        assert_eq!(leading_swizzle(pieces[1].take), "x");
    }
}
