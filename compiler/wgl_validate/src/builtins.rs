//! Builtin variables, constants and function signatures.

use wgl_ir::{
    ArrayLength, BasicType, Field, Intrinsic, Precision, SamplerKind, ShaderStage, Span,
    StorageQualifier, StringInterner, StructType, Type, TypeKind,
};

/// A `gl_*` variable or constant in scope for one stage.
#[derive(Clone, Debug)]
pub(crate) struct BuiltinVariable {
    pub name: &'static str,
    pub ty: Type,
    pub read_only: bool,
    /// Value of a builtin constant.
    pub value: Option<i32>,
}

/// Implementation limits, set to the GLSL ES 1.00 minimums.
pub const BUILTIN_CONSTANTS: &[(&str, i32)] = &[
    ("gl_MaxVertexAttribs", 8),
    ("gl_MaxVertexUniformVectors", 128),
    ("gl_MaxVaryingVectors", 8),
    ("gl_MaxVertexTextureImageUnits", 0),
    ("gl_MaxCombinedTextureImageUnits", 8),
    ("gl_MaxTextureImageUnits", 8),
    ("gl_MaxFragmentUniformVectors", 16),
    ("gl_MaxDrawBuffers", 1),
];

/// Value of `gl_MaxDrawBuffers`, the length of `gl_FragData`.
const MAX_DRAW_BUFFERS: u32 = 1;

pub(crate) fn builtin_variables(
    stage: ShaderStage,
    interner: &mut StringInterner,
) -> Vec<BuiltinVariable> {
    let var = |name, ty: Type, precision, read_only| BuiltinVariable {
        name,
        ty: ty.with_precision(precision),
        read_only,
        value: None,
    };
    let vec4 = || Type::vector(BasicType::Float, 4);

    let mut vars = match stage {
        ShaderStage::Vertex => vec![
            var("gl_Position", vec4(), Precision::High, false),
            var("gl_PointSize", Type::float(), Precision::Medium, false),
        ],
        ShaderStage::Fragment => vec![
            var("gl_FragCoord", vec4(), Precision::Medium, true),
            var("gl_FrontFacing", Type::bool(), Precision::None, true),
            var("gl_FragColor", vec4(), Precision::Medium, false),
            var(
                "gl_FragData",
                Type::array(
                    vec4().with_precision(Precision::Medium),
                    ArrayLength::constant(MAX_DRAW_BUFFERS),
                ),
                Precision::None,
                false,
            ),
            var(
                "gl_PointCoord",
                Type::vector(BasicType::Float, 2),
                Precision::Medium,
                true,
            ),
        ],
    };

    let field = |interner: &mut StringInterner, name| Field {
        name: interner.intern(name),
        ty: Type::float().with_precision(Precision::High),
        span: Span::DUMMY,
    };
    let depth_range = StructType {
        tag: Some(interner.intern("gl_DepthRangeParameters")),
        fields: vec![
            field(interner, "near"),
            field(interner, "far"),
            field(interner, "diff"),
        ],
    };
    vars.push(BuiltinVariable {
        name: "gl_DepthRange",
        ty: Type::new(TypeKind::Struct(Box::new(depth_range))).with_storage(StorageQualifier::Uniform),
        read_only: true,
        value: None,
    });

    vars.extend(BUILTIN_CONSTANTS.iter().map(|&(name, value)| BuiltinVariable {
        name,
        ty: Type::int()
            .with_storage(StorageQualifier::Const)
            .with_precision(Precision::Medium),
        read_only: true,
        value: Some(value),
    }));
    vars
}

/// Builtin outputs that may be redeclared `invariant`.
pub(crate) fn may_be_invariant(name: &str) -> bool {
    matches!(
        name,
        "gl_Position" | "gl_PointSize" | "gl_FragCoord" | "gl_FrontFacing" | "gl_PointCoord"
    )
}

/// Why a builtin call does not resolve.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum IntrinsicError {
    /// No overload takes these argument types.
    NoMatch,
    /// Overload exists, but only in vertex shaders.
    VertexOnly,
    /// Overload exists, but only in fragment shaders.
    FragmentOnly,
}

/// Size of a float scalar or vector, the `genType` of the GLSL ES builtins.
fn gen_size(ty: &Type) -> Option<u8> {
    match ty.kind {
        TypeKind::Basic(BasicType::Float) => Some(1),
        TypeKind::Vector(v) if v.element == BasicType::Float => Some(v.size),
        _ => None,
    }
}

fn same_gen(a: &Type, b: &Type) -> bool {
    gen_size(a).is_some() && a.kind == b.kind
}

fn is_sampler(ty: &Type, kind: SamplerKind) -> bool {
    matches!(ty.kind, TypeKind::Sampler(s) if s.is_es100() && s.kind == kind)
}

fn is_float_vector(ty: &Type, size: u8) -> bool {
    matches!(ty.kind, TypeKind::Vector(v) if v.element == BasicType::Float && v.size == size)
}

fn bvec(size: u8) -> Type {
    Type::vector(BasicType::Bool, size)
}

/// Result type of a builtin call, checked against the GLSL ES 1.00 overloads.
pub(crate) fn resolve_intrinsic(
    intrinsic: Intrinsic,
    args: &[Type],
    stage: ShaderStage,
) -> Result<Type, IntrinsicError> {
    use Intrinsic as I;

    let float = Type::float;
    let matched = |ok: bool, ty: Type| if ok { Ok(ty) } else { Err(IntrinsicError::NoMatch) };
    let unqualified = |ty: &Type| ty.unqualified();

    match (intrinsic, args) {
        (
            I::Radians
            | I::Degrees
            | I::Sin
            | I::Cos
            | I::Tan
            | I::Asin
            | I::Acos
            | I::Atan
            | I::Exp
            | I::Log
            | I::Exp2
            | I::Log2
            | I::Sqrt
            | I::Inversesqrt
            | I::Abs
            | I::Sign
            | I::Floor
            | I::Ceil
            | I::Fract
            | I::Normalize
            | I::DFdx
            | I::DFdy
            | I::Fwidth,
            [x],
        ) => matched(gen_size(x).is_some(), unqualified(x)),
        (I::Atan | I::Pow | I::Reflect, [x, y]) => matched(same_gen(x, y), unqualified(x)),
        (I::Mod | I::Min | I::Max, [x, y]) => {
            matched(same_gen(x, y) || (gen_size(x).is_some() && y.is_float_scalar()), unqualified(x))
        }
        (I::Step, [edge, x]) => {
            matched(same_gen(edge, x) || (edge.is_float_scalar() && gen_size(x).is_some()), unqualified(x))
        }
        (I::Clamp, [x, lo, hi]) => matched(
            (same_gen(x, lo) && same_gen(x, hi))
                || (gen_size(x).is_some() && lo.is_float_scalar() && hi.is_float_scalar()),
            unqualified(x),
        ),
        (I::Mix, [x, y, a]) => matched(
            same_gen(x, y) && (same_gen(x, a) || a.is_float_scalar()),
            unqualified(x),
        ),
        (I::Smoothstep, [lo, hi, x]) => matched(
            (same_gen(x, lo) && same_gen(x, hi))
                || (gen_size(x).is_some() && lo.is_float_scalar() && hi.is_float_scalar()),
            unqualified(x),
        ),
        (I::Faceforward, [n, i, nref]) => {
            matched(same_gen(n, i) && same_gen(n, nref), unqualified(n))
        }
        (I::Refract, [i, n, eta]) => {
            matched(same_gen(i, n) && eta.is_float_scalar(), unqualified(i))
        }
        (I::Length, [x]) => matched(gen_size(x).is_some(), float()),
        (I::Distance | I::Dot, [x, y]) => matched(same_gen(x, y), float()),
        (I::Cross, [x, y]) => matched(
            is_float_vector(x, 3) && is_float_vector(y, 3),
            Type::vector(BasicType::Float, 3),
        ),
        (I::MatrixCompMult, [x, y]) => matched(x.is_matrix() && x.kind == y.kind, unqualified(x)),
        (I::LessThan | I::LessThanEqual | I::GreaterThan | I::GreaterThanEqual, [x, y]) => {
            match x.as_vector() {
                Some(v) if matches!(v.element, BasicType::Float | BasicType::Int) => {
                    matched(x.kind == y.kind, bvec(v.size))
                }
                _ => Err(IntrinsicError::NoMatch),
            }
        }
        (I::Equal | I::NotEqual, [x, y]) => match x.as_vector() {
            Some(v) => matched(x.kind == y.kind, bvec(v.size)),
            None => Err(IntrinsicError::NoMatch),
        },
        (I::Any | I::All, [x]) => matched(
            x.as_vector().is_some_and(|v| v.element == BasicType::Bool),
            Type::bool(),
        ),
        (I::Not, [x]) => matched(
            x.as_vector().is_some_and(|v| v.element == BasicType::Bool),
            unqualified(x),
        ),
        (I::Texture2D, [s, coord, rest @ ..]) => texture_lookup(
            is_sampler(s, SamplerKind::Sampler2D) && is_float_vector(coord, 2),
            rest,
            false,
            stage,
        ),
        (I::Texture2DProj, [s, coord, rest @ ..]) => texture_lookup(
            is_sampler(s, SamplerKind::Sampler2D)
                && (is_float_vector(coord, 3) || is_float_vector(coord, 4)),
            rest,
            false,
            stage,
        ),
        (I::TextureCube, [s, coord, rest @ ..]) => texture_lookup(
            is_sampler(s, SamplerKind::SamplerCube) && is_float_vector(coord, 3),
            rest,
            false,
            stage,
        ),
        (I::Texture2DLod, [s, coord, rest @ ..]) => texture_lookup(
            is_sampler(s, SamplerKind::Sampler2D) && is_float_vector(coord, 2),
            rest,
            true,
            stage,
        ),
        (I::Texture2DProjLod, [s, coord, rest @ ..]) => texture_lookup(
            is_sampler(s, SamplerKind::Sampler2D)
                && (is_float_vector(coord, 3) || is_float_vector(coord, 4)),
            rest,
            true,
            stage,
        ),
        (I::TextureCubeLod, [s, coord, rest @ ..]) => texture_lookup(
            is_sampler(s, SamplerKind::SamplerCube) && is_float_vector(coord, 3),
            rest,
            true,
            stage,
        ),
        _ => Err(IntrinsicError::NoMatch),
    }
}

/// Shared tail of the texture lookups: an optional bias (fragment only) or
/// a mandatory LOD (vertex only).
fn texture_lookup(
    head_ok: bool,
    rest: &[Type],
    lod: bool,
    stage: ShaderStage,
) -> Result<Type, IntrinsicError> {
    let vec4 = Type::vector(BasicType::Float, 4);
    match rest {
        _ if !head_ok => Err(IntrinsicError::NoMatch),
        [] if !lod => Ok(vec4),
        [extra] if extra.is_float_scalar() => {
            if lod && !stage.is_vertex() {
                Err(IntrinsicError::VertexOnly)
            } else if !lod && stage.is_vertex() {
                Err(IntrinsicError::FragmentOnly)
            } else {
                Ok(vec4)
            }
        }
        _ => Err(IntrinsicError::NoMatch),
    }
}

/// Whether some builtin overload of `intrinsic` takes exactly `params`.
pub(crate) fn is_builtin_signature(intrinsic: Intrinsic, params: &[Type]) -> bool {
    [ShaderStage::Vertex, ShaderStage::Fragment]
        .into_iter()
        .any(|stage| resolve_intrinsic(intrinsic, params, stage).is_ok())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn vec(n: u8) -> Type {
        Type::vector(BasicType::Float, n)
    }

    #[test]
    fn test_gen_type_functions() {
        let frag = ShaderStage::Fragment;
        assert_eq!(resolve_intrinsic(Intrinsic::Sin, &[vec(3)], frag), Ok(vec(3)));
        assert_eq!(
            resolve_intrinsic(Intrinsic::Sin, &[Type::int()], frag),
            Err(IntrinsicError::NoMatch)
        );
        assert_eq!(
            resolve_intrinsic(Intrinsic::Max, &[vec(2), Type::float()], frag),
            Ok(vec(2))
        );
        assert_eq!(
            resolve_intrinsic(Intrinsic::Max, &[Type::float(), vec(2)], frag),
            Err(IntrinsicError::NoMatch)
        );
        assert_eq!(
            resolve_intrinsic(Intrinsic::Step, &[Type::float(), vec(4)], frag),
            Ok(vec(4))
        );
    }

    #[test]
    fn test_geometric_functions() {
        let frag = ShaderStage::Fragment;
        assert_eq!(resolve_intrinsic(Intrinsic::Dot, &[vec(3), vec(3)], frag), Ok(Type::float()));
        assert_eq!(resolve_intrinsic(Intrinsic::Cross, &[vec(3), vec(3)], frag), Ok(vec(3)));
        assert_eq!(
            resolve_intrinsic(Intrinsic::Cross, &[vec(2), vec(2)], frag),
            Err(IntrinsicError::NoMatch)
        );
    }

    #[test]
    fn test_vector_relational() {
        let frag = ShaderStage::Fragment;
        assert_eq!(
            resolve_intrinsic(Intrinsic::LessThan, &[vec(3), vec(3)], frag),
            Ok(Type::vector(BasicType::Bool, 3))
        );
        assert_eq!(
            resolve_intrinsic(Intrinsic::Any, &[Type::vector(BasicType::Bool, 2)], frag),
            Ok(Type::bool())
        );
    }

    #[test]
    fn test_texture_stage_rules() {
        let sampler = Type::sampler(SamplerKind::Sampler2D);
        let args = [sampler.clone(), vec(2)];
        assert_eq!(
            resolve_intrinsic(Intrinsic::Texture2D, &args, ShaderStage::Vertex),
            Ok(vec(4))
        );
        let bias = [sampler.clone(), vec(2), Type::float()];
        assert_eq!(
            resolve_intrinsic(Intrinsic::Texture2D, &bias, ShaderStage::Vertex),
            Err(IntrinsicError::FragmentOnly)
        );
        assert_eq!(
            resolve_intrinsic(Intrinsic::Texture2DLod, &bias, ShaderStage::Fragment),
            Err(IntrinsicError::VertexOnly)
        );
        assert_eq!(
            resolve_intrinsic(Intrinsic::Texture2DLod, &args, ShaderStage::Vertex),
            Err(IntrinsicError::NoMatch)
        );
    }

    #[test]
    fn test_builtin_signature_ignores_stage() {
        let bias = [Type::sampler(SamplerKind::Sampler2D), vec(2), Type::float()];
        assert!(is_builtin_signature(Intrinsic::Texture2D, &bias));
        assert!(!is_builtin_signature(Intrinsic::Texture2D, &[Type::float()]));
    }

    #[test]
    fn test_fragment_builtins() {
        let mut interner = StringInterner::new();
        let vars = builtin_variables(ShaderStage::Fragment, &mut interner);
        let names: Vec<_> = vars.iter().map(|v| v.name).collect();
        assert!(names.contains(&"gl_FragColor"));
        assert!(!names.contains(&"gl_Position"));
        let draw_buffers = vars.iter().find(|v| v.name == "gl_MaxDrawBuffers");
        assert_eq!(draw_buffers.and_then(|v| v.value), Some(1));
        let frag_data = vars.iter().find(|v| v.name == "gl_FragData");
        assert_eq!(frag_data.map(|v| v.ty.size()), Some(4));
    }
}
